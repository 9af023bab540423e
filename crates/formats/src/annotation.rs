use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One coordinate as it appears in annotation exports.
///
/// Exports carry decimals as JSON strings (`"36.79"`) or numbers. Anything
/// else (null, booleans, nested values) is kept verbatim so a single bad
/// point does not reject the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Default for Coord {
    fn default() -> Self {
        Coord::Other(Value::Null)
    }
}

impl Coord {
    /// Finite decimal value, if this coordinate holds one.
    ///
    /// Text is trimmed before parsing; empty text is not a number.
    pub fn parse_decimal(&self) -> Option<f64> {
        let v = match self {
            Coord::Number(n) => *n,
            Coord::Text(s) => s.trim().parse::<f64>().ok()?,
            Coord::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for Coord {
    fn from(v: f64) -> Self {
        Coord::Number(v)
    }
}

impl From<&str> for Coord {
    fn from(v: &str) -> Self {
        Coord::Text(v.to_string())
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coord::Number(n) => write!(f, "{n}"),
            Coord::Text(s) => write!(f, "{s:?}"),
            Coord::Other(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPoint {
    #[serde(default)]
    pub x: Coord,
    #[serde(default)]
    pub y: Coord,
}

impl RawPoint {
    pub fn new(x: impl Into<Coord>, y: impl Into<Coord>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Which point list of an annotation was used.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointList {
    Percent,
    Pixel,
}

/// A booth shape exported from the annotation tool.
///
/// `shape` and `rotation` are informational; aggregation only reads the code
/// and the point lists.
///
/// Deserialization never fails on a JSON object: a numeric code is read as
/// text, other codes become empty, and a point list that is not an array
/// becomes empty. Aggregation then skips what is left unusable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnnotation {
    #[serde(default, deserialize_with = "lenient_code")]
    pub code: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub shape: String,
    #[serde(default)]
    pub rotation: Coord,
    #[serde(default, deserialize_with = "lenient_points")]
    pub points: Vec<RawPoint>,
    #[serde(default, deserialize_with = "lenient_points")]
    pub points_percent: Vec<RawPoint>,
}

fn lenient_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Arrays keep one entry per element; an element that is not a point object
/// becomes a point with no coordinates.
fn lenient_points<'de, D>(deserializer: D) -> Result<Vec<RawPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

impl RawAnnotation {
    /// Reads one element of a positions document.
    ///
    /// Anything that is not an object yields an annotation without code or
    /// points, keeping its place in the list.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            shape: "rect".to_string(),
            rotation: Coord::Number(0.0),
            ..Default::default()
        }
    }

    pub fn with_points(mut self, points: Vec<RawPoint>) -> Self {
        self.points = points;
        self
    }

    pub fn with_points_percent(mut self, points: Vec<RawPoint>) -> Self {
        self.points_percent = points;
        self
    }

    /// `pointsPercent` when non-empty, otherwise `points` when non-empty.
    pub fn preferred_points(&self) -> Option<(PointList, &[RawPoint])> {
        if !self.points_percent.is_empty() {
            Some((PointList::Percent, &self.points_percent))
        } else if !self.points.is_empty() {
            Some((PointList::Pixel, &self.points))
        } else {
            None
        }
    }
}
