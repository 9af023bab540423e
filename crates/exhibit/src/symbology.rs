use serde::{Deserialize, Serialize};

/// Color used for booths whose category letter is not in the legend.
pub const FALLBACK_COLOR: &str = "#FFFFFF";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub code: char,
    pub color: String,
    pub label: String,
}

impl Category {
    pub fn new(code: char, color: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code,
            color: color.into(),
            label: label.into(),
        }
    }
}

/// Ordered category legend, looked up by category letter.
///
/// Ordering contract:
/// - Iteration yields categories in the order they were supplied, which is
///   the order filter buttons are presented in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> + '_ {
        self.categories.iter()
    }

    /// First entry with a matching code.
    pub fn get(&self, code: char) -> Option<&Category> {
        self.categories.iter().find(|c| c.code == code)
    }

    /// Display color for `code`, or [`FALLBACK_COLOR`].
    pub fn color_for(&self, code: char) -> &str {
        self.get(code).map_or(FALLBACK_COLOR, |c| c.color.as_str())
    }

    pub fn label_for(&self, code: char) -> Option<&str> {
        self.get(code).map(|c| c.label.as_str())
    }
}

/// Category letter of a booth code: its first character.
pub fn category_of(booth_code: &str) -> Option<char> {
    booth_code.chars().next()
}
