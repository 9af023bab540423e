use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Description used for booths missing from the directory.
pub const FALLBACK_DESCRIPTION: &str = "Booth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoothDescription {
    pub title: String,
    pub description: String,
}

impl BoothDescription {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// `{title: code, description: "Booth"}`.
    pub fn fallback(code: &str) -> Self {
        Self::new(code, FALLBACK_DESCRIPTION)
    }
}

/// Booth code -> title/description lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoothDirectory {
    entries: BTreeMap<String, BoothDescription>,
}

impl BoothDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, desc: BoothDescription) {
        self.entries.insert(code.into(), desc);
    }

    pub fn get(&self, code: &str) -> Option<&BoothDescription> {
        self.entries.get(code)
    }

    /// Directory entry for `code`, or [`BoothDescription::fallback`].
    pub fn describe(&self, code: &str) -> BoothDescription {
        self.get(code)
            .cloned()
            .unwrap_or_else(|| BoothDescription::fallback(code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, BoothDescription)> for BoothDirectory {
    fn from_iter<I: IntoIterator<Item = (String, BoothDescription)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
