use std::collections::BTreeMap;

use exhibit::{ExhibitConfig, category_of};
use foundation::math::{Vec2, centroid};
use formats::{PointList, RawAnnotation};
use serde::{Deserialize, Serialize};

use crate::canvas::{InvalidPointError, Normalizer};

/// A booth marker on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booth {
    pub code: String,
    pub title: String,
    pub description: String,
    pub category: char,
    pub color: String,
    pub center_x: f64,
    pub center_y: f64,
}

impl Booth {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.center_y)
    }
}

/// A point that could not be read and was left out of its booth.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPoint {
    pub code: String,
    /// Position of the annotation in the input list.
    pub annotation: usize,
    /// List the point was read from.
    pub list: PointList,
    /// Position of the point within that list.
    pub point: usize,
    pub error: InvalidPointError,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingCode,
    NoPoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedAnnotation {
    pub annotation: usize,
    pub reason: SkipReason,
}

/// Result of one aggregation run.
///
/// `booths` is ordered by code. The skip lists are for logging only; nothing
/// in them prevents the remaining booths from being produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub booths: Vec<Booth>,
    pub skipped_points: Vec<SkippedPoint>,
    pub skipped_annotations: Vec<SkippedAnnotation>,
}

/// Groups annotations by booth code and places each booth at the mean of its
/// normalized points.
///
/// - Each annotation contributes its `pointsPercent` list when non-empty,
///   otherwise its `points` list.
/// - Unreadable points are skipped one by one; a code only appears once it
///   has at least one readable point.
/// - Color and title fall back to `FALLBACK_COLOR` and `{code, "Booth"}` for
///   codes the exhibit tables do not know.
pub fn aggregate_booths(
    annotations: &[RawAnnotation],
    exhibit: &ExhibitConfig,
    normalizer: &Normalizer,
) -> Aggregation {
    let mut out = Aggregation::default();
    let mut points_by_code: BTreeMap<&str, Vec<Vec2>> = BTreeMap::new();

    for (ai, ann) in annotations.iter().enumerate() {
        let code = ann.code.trim();
        if code.is_empty() {
            out.skipped_annotations.push(SkippedAnnotation {
                annotation: ai,
                reason: SkipReason::MissingCode,
            });
            continue;
        }
        let Some((list, points)) = ann.preferred_points() else {
            out.skipped_annotations.push(SkippedAnnotation {
                annotation: ai,
                reason: SkipReason::NoPoints,
            });
            continue;
        };

        for (pi, raw) in points.iter().enumerate() {
            match normalizer.normalize(raw) {
                Ok(p) => points_by_code.entry(code).or_default().push(p),
                Err(error) => out.skipped_points.push(SkippedPoint {
                    code: code.to_string(),
                    annotation: ai,
                    list,
                    point: pi,
                    error,
                }),
            }
        }
    }

    out.booths = points_by_code
        .into_iter()
        .filter_map(|(code, points)| {
            let category = category_of(code)?;
            let center = centroid(&points)?;
            let desc = exhibit.descriptions.describe(code);
            Some(Booth {
                code: code.to_string(),
                title: desc.title,
                description: desc.description,
                category,
                color: exhibit.categories.color_for(category).to_string(),
                center_x: center.x,
                center_y: center.y,
            })
        })
        .collect();

    out
}
