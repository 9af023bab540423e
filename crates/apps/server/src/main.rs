use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use exhibit::{gik, ExhibitConfig};
use floorplan::{CanvasSize, Normalizer, DEFAULT_HIT_RADIUS};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod booths;
mod teams;

use booths::BoothStore;
use teams::{
    ServiceAccount, SheetsAuth, SheetsConfig, SheetsSource, TeamsSource, DEFAULT_SHEETS_URL,
    DEFAULT_SHEET_RANGE, DEFAULT_TOKEN_URL,
};

#[derive(Clone)]
pub(crate) struct AppState {
    config: Arc<ServerConfig>,
    exhibit: Arc<ExhibitConfig>,
    normalizer: Normalizer,
    booths: Arc<BoothStore>,
    teams: Option<Arc<dyn TeamsSource>>,
}

#[derive(Clone, Debug)]
pub(crate) struct ServerConfig {
    addr: String,
    positions_path: PathBuf,
    tables_path: Option<PathBuf>,
    canvas: CanvasSize,
    hit_radius: f64,
    sheets: Option<SheetsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9200".to_string(),
            positions_path: PathBuf::from("public/booth-positions.json"),
            tables_path: None,
            canvas: CanvasSize::default(),
            hit_radius: DEFAULT_HIT_RADIUS,
            sheets: None,
        }
    }
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let f64_var = |key: &str, default: f64| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // A service account wins over an API key when both are set.
        let auth = match (
            non_empty("GOOGLE_SERVICE_ACCOUNT_EMAIL"),
            non_empty("GOOGLE_PRIVATE_KEY"),
            non_empty("GOOGLE_API_KEY"),
        ) {
            (Some(email), Some(key), _) => Some(SheetsAuth::ServiceAccount(ServiceAccount::new(
                email,
                &key,
                non_empty("GOOGLE_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            ))),
            (_, _, Some(api_key)) => Some(SheetsAuth::ApiKey(api_key)),
            _ => None,
        };

        // The teams route needs a sheet and credentials; otherwise it serves [].
        let sheets = match (non_empty("GOOGLE_SHEET_ID"), auth) {
            (Some(sheet_id), Some(auth)) => Some(SheetsConfig {
                base_url: non_empty("GOOGLE_SHEETS_URL")
                    .unwrap_or_else(|| DEFAULT_SHEETS_URL.to_string()),
                sheet_id,
                range: non_empty("GOOGLE_SHEET_RANGE")
                    .unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
                auth,
            }),
            _ => None,
        };

        Self {
            addr: non_empty("BOOTHMAP_ADDR").unwrap_or(defaults.addr),
            positions_path: non_empty("BOOTH_POSITIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.positions_path),
            tables_path: non_empty("EXHIBIT_TABLES_PATH").map(PathBuf::from),
            canvas: CanvasSize::new(
                f64_var("CANVAS_WIDTH", defaults.canvas.width),
                f64_var("CANVAS_HEIGHT", defaults.canvas.height),
            ),
            hit_radius: f64_var("HIT_RADIUS", defaults.hit_radius),
            sheets,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(ServerConfig::from_env()).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), String> {
    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|e| format!("invalid BOOTHMAP_ADDR {:?}: {e}", config.addr))?;
    if !config.canvas.is_valid() {
        return Err(format!("invalid canvas size {:?}", config.canvas));
    }
    if !valid_radius(config.hit_radius) {
        return Err(format!(
            "invalid HIT_RADIUS {}: must be finite and positive",
            config.hit_radius
        ));
    }

    let exhibit = match &config.tables_path {
        Some(path) => ExhibitConfig::from_path(path)
            .map_err(|e| format!("exhibit tables {path:?}: {e}"))?,
        None => gik::exhibit(),
    };

    let teams: Option<Arc<dyn TeamsSource>> = match &config.sheets {
        Some(sheets) => {
            let source: Arc<dyn TeamsSource> =
                Arc::new(SheetsSource::new(sheets.clone(), reqwest::Client::new()));
            Some(source)
        }
        None => {
            warn!(
                "GOOGLE_SHEET_ID and service account or API key not set; /api/teams will return []"
            );
            None
        }
    };

    let state = AppState {
        normalizer: Normalizer::new(config.canvas),
        config: Arc::new(config),
        exhibit: Arc::new(exhibit),
        booths: Arc::new(BoothStore::new()),
        teams,
    };

    booths::reload(&state).await;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/teams", get(teams::list_teams))
        .route("/api/booths", get(booths::list_booths))
        .route("/api/booths/pick", get(booths::pick))
        .route("/api/booths/reload", post(booths::reload_booths))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("bind {addr}: {e}"))?;
    info!("boothmap server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {e}"))
}

fn valid_radius(radius: f64) -> bool {
    radius.is_finite() && radius > 0.0
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}
