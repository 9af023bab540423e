use exhibit::CategoryTable;
use foundation::math::Vec2;

use crate::booths::Booth;
use crate::picking::{PickOptions, pick_booth};
use crate::query::{BoothQuery, find_booth, query_booths};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Map view state owned by the caller.
///
/// Transitions take the state by value and return the next one; booths are
/// passed in on every call and never stored. Selection is kept by code, so it
/// survives a reload as long as the booth still exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapState {
    pub selected: Option<String>,
    pub category: Option<char>,
    pub cursor: Cursor,
    /// Last pointer position, in canvas pixels.
    pub pointer: Vec2,
}

/// What the details panel shows for the selected booth.
#[derive(Debug, Clone, PartialEq)]
pub struct BoothDetails<'a> {
    pub booth: &'a Booth,
    pub category_label: Option<&'a str>,
}

impl MapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the booth under `p`. A miss keeps the current selection.
    pub fn click(mut self, booths: &[Booth], p: Vec2, opts: PickOptions) -> Self {
        if let Some(hit) = pick_booth(booths, p, opts) {
            self.selected = Some(hit.code.clone());
        }
        self
    }

    /// Tracks the pointer and shows a pointer cursor over booth markers.
    pub fn hover(mut self, booths: &[Booth], p: Vec2, opts: PickOptions) -> Self {
        self.cursor = match pick_booth(booths, p, opts) {
            Some(_) => Cursor::Pointer,
            None => Cursor::Default,
        };
        self.pointer = p;
        self
    }

    /// Selection from the booth list.
    pub fn select(mut self, code: impl Into<String>) -> Self {
        self.selected = Some(code.into());
        self
    }

    pub fn clear_selection(mut self) -> Self {
        self.selected = None;
        self
    }

    /// Sets the category filter; `None` shows all booths.
    pub fn filter(mut self, category: Option<char>) -> Self {
        self.category = category;
        self
    }

    /// Drops a selection whose booth is gone after a reload.
    pub fn reconcile(mut self, booths: &[Booth]) -> Self {
        if self
            .selected
            .as_deref()
            .is_some_and(|code| find_booth(booths, code).is_none())
        {
            self.selected = None;
        }
        self
    }

    /// Booths passing the current category filter.
    pub fn visible<'a>(&self, booths: &'a [Booth]) -> Vec<&'a Booth> {
        let query = BoothQuery {
            category: self.category,
            ..Default::default()
        };
        query_booths(booths, &query)
    }

    pub fn selected_booth<'a>(&self, booths: &'a [Booth]) -> Option<&'a Booth> {
        find_booth(booths, self.selected.as_deref()?)
    }

    pub fn details<'a>(
        &self,
        booths: &'a [Booth],
        categories: &'a CategoryTable,
    ) -> Option<BoothDetails<'a>> {
        let booth = self.selected_booth(booths)?;
        Some(BoothDetails {
            booth,
            category_label: categories.label_for(booth.category),
        })
    }
}
