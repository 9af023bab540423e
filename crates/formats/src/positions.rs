use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::annotation::{RawAnnotation, RawPoint};

pub const BOOTH_POSITIONS_FILE_NAME: &str = "booth-positions.json";

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("booth positions parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("booth positions must be a JSON array")]
    NotAnArray,
    #[error("booth positions array is empty")]
    Empty,
}

/// Parses an exported booth positions document (a JSON array of annotations).
///
/// Elements are read one by one, so a malformed entry costs only itself; it
/// stays in the list as an annotation aggregation will skip. An empty array
/// is reported as [`FormatError::Empty`] so callers can treat it like a
/// missing resource.
pub fn parse_booth_positions(text: &str) -> Result<Vec<RawAnnotation>, FormatError> {
    let Value::Array(items) = serde_json::from_str::<Value>(text)? else {
        return Err(FormatError::NotAnArray);
    };
    if items.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(items.into_iter().map(RawAnnotation::from_value).collect())
}

pub fn read_booth_positions(path: impl AsRef<Path>) -> Result<Vec<RawAnnotation>, FormatError> {
    let payload = fs::read_to_string(path)?;
    parse_booth_positions(&payload)
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionsOrigin {
    Resource,
    /// Embedded list; `reason` says why the resource was not used.
    Fallback { reason: String },
}

/// Annotation list ready for aggregation, plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct BoothPositions {
    pub annotations: Vec<RawAnnotation>,
    pub origin: PositionsOrigin,
}

impl BoothPositions {
    /// Uses the loaded list when it is usable, the embedded list otherwise.
    pub fn resolve(loaded: Result<Vec<RawAnnotation>, FormatError>) -> Self {
        match loaded {
            Ok(annotations) => Self {
                annotations,
                origin: PositionsOrigin::Resource,
            },
            Err(err) => Self::fallback(err.to_string()),
        }
    }

    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            annotations: fallback_annotations(),
            origin: PositionsOrigin::Fallback {
                reason: reason.into(),
            },
        }
    }

    /// Reads `path`, falling back to the embedded list on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::resolve(read_booth_positions(path))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, PositionsOrigin::Fallback { .. })
    }
}

/// Booth rectangles shipped with the map, used when no export is available.
pub fn fallback_annotations() -> Vec<RawAnnotation> {
    const RECTS: [(&str, [&str; 4], [&str; 4]); 6] = [
        ("C-01", ["74.76", "96.20", "74.76", "96.20"], ["12.46", "19.24", "12.46", "19.24"]),
        ("A-01", ["220.76", "101.03", "241.76", "125.03"], ["36.79", "20.21", "40.29", "25.01"]),
        ("B-01", ["148.76", "102.20", "169.76", "127.20"], ["24.79", "20.44", "28.29", "25.44"]),
        ("D-01", ["104.76", "256.03", "125.76", "285.03"], ["17.46", "51.21", "20.96", "57.01"]),
        ("E-01", ["224.76", "282.20", "247.76", "310.20"], ["37.46", "56.44", "41.29", "62.04"]),
        ("F-01", ["308.76", "384.20", "332.76", "412.20"], ["51.46", "76.84", "55.46", "82.44"]),
    ];

    RECTS
        .iter()
        .map(|(code, px, pct)| {
            RawAnnotation::new(*code)
                .with_points(vec![RawPoint::new(px[0], px[1]), RawPoint::new(px[2], px[3])])
                .with_points_percent(vec![
                    RawPoint::new(pct[0], pct[1]),
                    RawPoint::new(pct[2], pct[3]),
                ])
        })
        .collect()
}
