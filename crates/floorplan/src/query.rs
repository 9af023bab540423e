use std::collections::BTreeMap;

use crate::booths::Booth;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoothQuery {
    /// Only booths in this category; `None` keeps every booth.
    pub category: Option<char>,
    pub limit: Option<usize>,
}

impl BoothQuery {
    pub fn category(category: char) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }
}

/// Booths matching `query`, in input order.
pub fn query_booths<'a>(booths: &'a [Booth], query: &BoothQuery) -> Vec<&'a Booth> {
    let matching = booths
        .iter()
        .filter(|b| query.category.is_none_or(|c| b.category == c));
    match query.limit {
        Some(limit) => matching.take(limit).collect(),
        None => matching.collect(),
    }
}

pub fn find_booth<'a>(booths: &'a [Booth], code: &str) -> Option<&'a Booth> {
    booths.iter().find(|b| b.code == code)
}

/// Booth count per category letter.
pub fn count_by_category(booths: &[Booth]) -> BTreeMap<char, usize> {
    let mut counts = BTreeMap::new();
    for b in booths {
        *counts.entry(b.category).or_insert(0) += 1;
    }
    counts
}
