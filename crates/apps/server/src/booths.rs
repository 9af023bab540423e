//! Booth list served to the map page.
//!
//! Every reload recomputes the whole list. Loads are numbered; a finished
//! load is only published if no newer load was started in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use floorplan::query::{count_by_category, query_booths, BoothQuery};
use floorplan::{aggregate_booths, pick_booth, Booth, PickOptions};
use formats::{parse_booth_positions, BoothPositions, FormatError, PositionsOrigin};
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct BoothSnapshot {
    pub generation: u64,
    pub booths: Vec<Booth>,
    pub origin: PositionsOrigin,
}

impl BoothSnapshot {
    fn empty() -> Self {
        Self {
            generation: 0,
            booths: Vec::new(),
            origin: PositionsOrigin::Fallback {
                reason: "not loaded yet".to_string(),
            },
        }
    }
}

/// Identifies one load attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

pub struct BoothStore {
    issued: AtomicU64,
    current: RwLock<Arc<BoothSnapshot>>,
}

impl Default for BoothStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoothStore {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            current: RwLock::new(Arc::new(BoothSnapshot::empty())),
        }
    }

    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Publishes `booths` unless a newer load has been started.
    ///
    /// Returns `true` if the snapshot was replaced.
    pub async fn commit(
        &self,
        ticket: LoadTicket,
        booths: Vec<Booth>,
        origin: PositionsOrigin,
    ) -> bool {
        let mut current = self.current.write().await;
        if ticket.0 != self.issued.load(Ordering::SeqCst) || ticket.0 <= current.generation {
            return false;
        }
        *current = Arc::new(BoothSnapshot {
            generation: ticket.0,
            booths,
            origin,
        });
        true
    }

    pub async fn snapshot(&self) -> Arc<BoothSnapshot> {
        self.current.read().await.clone()
    }
}

async fn read_positions(state: &AppState) -> BoothPositions {
    let loaded = match tokio::fs::read_to_string(&state.config.positions_path).await {
        Ok(text) => parse_booth_positions(&text),
        Err(err) => Err(FormatError::Io(err)),
    };
    BoothPositions::resolve(loaded)
}

/// Loads positions, aggregates them and publishes the result.
pub async fn reload(state: &AppState) -> Arc<BoothSnapshot> {
    let ticket = state.booths.begin_load();
    let positions = read_positions(state).await;
    if let PositionsOrigin::Fallback { reason } = &positions.origin {
        warn!(
            "booth positions {:?} unusable ({reason}); using embedded layout",
            state.config.positions_path
        );
    }

    let agg = aggregate_booths(&positions.annotations, &state.exhibit, &state.normalizer);
    for skipped in &agg.skipped_points {
        warn!(
            "booth {} annotation #{} {:?} point #{} skipped: {}",
            skipped.code, skipped.annotation, skipped.list, skipped.point, skipped.error
        );
    }
    for skipped in &agg.skipped_annotations {
        debug!(
            "annotation #{} skipped: {:?}",
            skipped.annotation, skipped.reason
        );
    }

    let count = agg.booths.len();
    let per_category = count_by_category(&agg.booths);
    if state
        .booths
        .commit(ticket, agg.booths, positions.origin)
        .await
    {
        info!("loaded {count} booths (generation {})", ticket.0);
        debug!("booths per category: {per_category:?}");
    } else {
        debug!("discarded superseded booth load {}", ticket.0);
    }
    state.booths.snapshot().await
}

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoothsResponse {
    pub generation: u64,
    pub fallback: bool,
    pub booths: Vec<Booth>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoothsParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

fn parse_category(raw: &str) -> Option<char> {
    let mut chars = raw.trim().chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_ascii_alphabetic() {
        return None;
    }
    Some(c.to_ascii_uppercase())
}

pub async fn list_booths(
    State(state): State<AppState>,
    Query(params): Query<BoothsParams>,
) -> Result<Json<BoothsResponse>, (StatusCode, Json<Value>)> {
    let category = match params.category.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(parse_category(raw).ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("category must be a single letter, got {raw:?}"),
            )
        })?),
    };

    let snap = state.booths.snapshot().await;
    let query = BoothQuery {
        category,
        limit: params.limit,
    };
    let booths = query_booths(&snap.booths, &query)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(BoothsResponse {
        generation: snap.generation,
        fallback: !matches!(snap.origin, PositionsOrigin::Resource),
        booths,
    }))
}

#[derive(Debug, Deserialize)]
pub struct PickParams {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct PickResponse {
    pub booth: Option<Booth>,
}

pub async fn pick(
    State(state): State<AppState>,
    Query(params): Query<PickParams>,
) -> Json<PickResponse> {
    let snap = state.booths.snapshot().await;
    let opts = PickOptions {
        radius: state.config.hit_radius,
    };
    let booth = pick_booth(&snap.booths, Vec2::new(params.x, params.y), opts).cloned();
    Json(PickResponse { booth })
}

pub async fn reload_booths(State(state): State<AppState>) -> Json<Value> {
    let snap = reload(&state).await;
    Json(json!({
        "generation": snap.generation,
        "count": snap.booths.len(),
        "fallback": !matches!(snap.origin, PositionsOrigin::Resource),
    }))
}
