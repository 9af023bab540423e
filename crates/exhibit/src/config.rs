use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::directory::BoothDirectory;
use crate::symbology::CategoryTable;

#[derive(Debug, thiserror::Error)]
pub enum ExhibitConfigError {
    #[error("exhibit tables unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("exhibit tables are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("category code {0:?} is not an uppercase ASCII letter")]
    InvalidCategoryCode(char),
    #[error("category {0:?} is listed more than once")]
    DuplicateCategory(char),
}

/// Static tables consumed by the booth aggregator.
///
/// JSON shape:
/// `{ "categories": [{"code","color","label"}], "descriptions": {"A-01": {"title","description"}} }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhibitConfig {
    #[serde(default)]
    pub categories: CategoryTable,
    #[serde(default)]
    pub descriptions: BoothDirectory,
}

impl ExhibitConfig {
    pub fn new(categories: CategoryTable, descriptions: BoothDirectory) -> Self {
        Self {
            categories,
            descriptions,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ExhibitConfigError> {
        let cfg: ExhibitConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExhibitConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Category letters must be unique uppercase ASCII letters.
    pub fn validate(&self) -> Result<(), ExhibitConfigError> {
        let mut seen = BTreeSet::new();
        for c in self.categories.iter() {
            if !c.code.is_ascii_uppercase() {
                return Err(ExhibitConfigError::InvalidCategoryCode(c.code));
            }
            if !seen.insert(c.code) {
                return Err(ExhibitConfigError::DuplicateCategory(c.code));
            }
        }
        Ok(())
    }
}
