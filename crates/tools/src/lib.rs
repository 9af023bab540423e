//! Shared pieces of the `boothmap` command line.

use std::path::Path;

use exhibit::{ExhibitConfig, gik};
use floorplan::{Aggregation, CanvasSize, Normalizer, aggregate_booths};
use formats::BoothPositions;

/// Booths built from one positions file, plus how they were obtained.
#[derive(Debug, Clone)]
pub struct LoadedBooths {
    pub positions: BoothPositions,
    pub aggregation: Aggregation,
}

/// Parses `WxH`, e.g. `600x500`.
pub fn parse_canvas_size(s: &str) -> Result<CanvasSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("canvas must look like WIDTHxHEIGHT, got {s:?}"))?;
    let width: f64 = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid canvas width {w:?}"))?;
    let height: f64 = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid canvas height {h:?}"))?;
    let canvas = CanvasSize::new(width, height);
    if !canvas.is_valid() {
        return Err(format!("canvas size must be positive, got {s:?}"));
    }
    Ok(canvas)
}

/// A single category letter, case-insensitive.
pub fn parse_category(s: &str) -> Result<char, String> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => Err(format!("category must be a single letter, got {s:?}")),
    }
}

pub fn load_exhibit(tables: Option<&Path>) -> Result<ExhibitConfig, String> {
    match tables {
        Some(path) => ExhibitConfig::from_path(path).map_err(|e| format!("read {path:?}: {e}")),
        None => Ok(gik::exhibit()),
    }
}

/// Loads and aggregates; a missing or unusable file yields the built-in layout.
pub fn load_booths(positions: &Path, exhibit: &ExhibitConfig, canvas: CanvasSize) -> LoadedBooths {
    let positions = BoothPositions::load(positions);
    let aggregation = aggregate_booths(&positions.annotations, exhibit, &Normalizer::new(canvas));
    LoadedBooths {
        positions,
        aggregation,
    }
}
