use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use formats::RawPoint;
use serde::{Deserialize, Serialize};

/// Design canvas the floor plan image is drawn on.
pub const DEFAULT_CANVAS_WIDTH: f64 = 600.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 500.0;

/// Coordinates with both magnitudes at or below this are read as percentages.
pub const PERCENT_LIMIT: f64 = 100.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width and height are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::from_size(self.width, self.height)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{axis} coordinate {value} is not a finite number")]
pub struct InvalidPointError {
    pub axis: Axis,
    /// The offending value as it appeared in the source.
    pub value: String,
}

/// Unit a point is read in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordSpace {
    Percent,
    Pixel,
}

impl CoordSpace {
    /// Percent when both `|x|` and `|y|` are at most 100, pixel otherwise.
    ///
    /// Annotation exports carry no unit, so this is a heuristic: a genuine
    /// pixel coordinate at or below 100 on both axes is read as a percentage
    /// and scaled. Only a unit-carrying export format can fix that.
    pub fn classify(x: f64, y: f64) -> Self {
        if x.abs() <= PERCENT_LIMIT && y.abs() <= PERCENT_LIMIT {
            CoordSpace::Percent
        } else {
            CoordSpace::Pixel
        }
    }
}

/// Converts annotation points to canvas pixels.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Normalizer {
    canvas: CanvasSize,
}

impl Normalizer {
    pub fn new(canvas: CanvasSize) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Parses and normalizes one raw point.
    pub fn normalize(&self, point: &RawPoint) -> Result<Vec2, InvalidPointError> {
        let x = point.x.parse_decimal().ok_or_else(|| InvalidPointError {
            axis: Axis::X,
            value: point.x.to_string(),
        })?;
        let y = point.y.parse_decimal().ok_or_else(|| InvalidPointError {
            axis: Axis::Y,
            value: point.y.to_string(),
        })?;
        Ok(self.normalize_xy(x, y))
    }

    pub fn normalize_xy(&self, x: f64, y: f64) -> Vec2 {
        match CoordSpace::classify(x, y) {
            CoordSpace::Percent => Vec2::new(
                x / PERCENT_LIMIT * self.canvas.width,
                y / PERCENT_LIMIT * self.canvas.height,
            ),
            // Source pixels are assumed to match the canvas 1:1.
            CoordSpace::Pixel => Vec2::new(x, y),
        }
    }
}
