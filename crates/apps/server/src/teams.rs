//! Read-only teams list backed by a Google spreadsheet.
//!
//! The route never fails: missing configuration and upstream errors both
//! produce an empty list.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::Json;
use formats::{Team, ValueRange};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::AppState;

pub const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Without a sheet name, A1 ranges address the first sheet.
pub const DEFAULT_SHEET_RANGE: &str = "A:Z";

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;
/// Tokens are refreshed this long before they expire.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum TeamsError {
    #[error("sheets request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sheets returned HTTP {0}")]
    Status(u16),
    #[error("token endpoint returned HTTP {0}")]
    TokenStatus(u16),
    #[error("signing service account assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid sheets base url {0}")]
    BaseUrl(String),
}

/// Anything that can list teams.
pub trait TeamsSource: Send + Sync {
    fn fetch_teams(&self) -> BoxFuture<'_, Result<Vec<Team>, TeamsError>>;
}

/// Google service account used to sign token requests.
#[derive(Clone)]
pub struct ServiceAccount {
    pub email: String,
    /// PEM encoded RSA key.
    pub private_key: String,
    pub token_url: String,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("email", &self.email)
            .field("private_key", &"<redacted>")
            .field("token_url", &self.token_url)
            .finish()
    }
}

impl ServiceAccount {
    /// Env files usually carry the key on one line with literal `\n`
    /// sequences; those are turned back into line breaks.
    pub fn new(
        email: impl Into<String>,
        private_key: &str,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            private_key: private_key.replace("\\n", "\n"),
            token_url: token_url.into(),
        }
    }

    /// Signed RS256 assertion for the JWT bearer grant.
    fn assertion(&self, now: u64) -> Result<String, TeamsError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        let claims = AssertionClaims {
            iss: &self.email,
            scope: SHEETS_SCOPE,
            aud: &self.token_url,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &key,
        )?)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Clone)]
pub enum SheetsAuth {
    /// Only works for sheets shared publicly.
    ApiKey(String),
    ServiceAccount(ServiceAccount),
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub base_url: String,
    pub sheet_id: String,
    pub range: String,
    pub auth: SheetsAuth,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Google Sheets v4 `values.get` client.
pub struct SheetsSource {
    config: SheetsConfig,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl SheetsSource {
    pub fn new(config: SheetsConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            token: Mutex::new(None),
        }
    }

    fn values_url(&self) -> Result<Url, TeamsError> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base).map_err(|e| TeamsError::BaseUrl(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| TeamsError::BaseUrl(base.clone()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.sheet_id.as_str(),
                "values",
                self.config.range.as_str(),
            ]);
        Ok(url)
    }

    async fn access_token(&self, account: &ServiceAccount) -> Result<String, TeamsError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let assertion = account.assertion(unix_now())?;
        let resp = self
            .client
            .post(&account.token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(TeamsError::TokenStatus(resp.status().as_u16()));
        }

        let token: TokenResponse = resp.json().await?;
        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        debug!("obtained sheets access token for {} ({lifetime}s)", account.email);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(token.access_token)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl TeamsSource for SheetsSource {
    fn fetch_teams(&self) -> BoxFuture<'_, Result<Vec<Team>, TeamsError>> {
        Box::pin(async move {
            let url = self.values_url()?;
            let request = match &self.config.auth {
                SheetsAuth::ApiKey(key) => self.client.get(url).query(&[("key", key.as_str())]),
                SheetsAuth::ServiceAccount(account) => {
                    let token = self.access_token(account).await?;
                    self.client.get(url).bearer_auth(token)
                }
            };

            let resp = request.send().await?;
            if !resp.status().is_success() {
                return Err(TeamsError::Status(resp.status().as_u16()));
            }

            let values: ValueRange = resp.json().await?;
            Ok(values.teams())
        })
    }
}

/// Teams from `source`, or an empty list when unconfigured or failing.
pub async fn load_teams(source: Option<&Arc<dyn TeamsSource>>) -> Vec<Team> {
    let Some(source) = source else {
        warn!("teams spreadsheet is not configured; returning empty list");
        return Vec::new();
    };
    match source.fetch_teams().await {
        Ok(teams) => teams,
        Err(err) => {
            error!("fetching teams failed: {err}");
            Vec::new()
        }
    }
}

pub async fn list_teams(State(state): State<AppState>) -> Json<Vec<Team>> {
    Json(load_teams(state.teams.as_ref()).await)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::{Form, Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use formats::Team;
    use jsonwebtoken::{DecodingKey, Validation};
    use serde::Deserialize;
    use serde_json::{json, Value};

    use super::{
        load_teams, BoxFuture, ServiceAccount, SheetsAuth, SheetsConfig,
        SheetsSource, TeamsError, TeamsSource, DEFAULT_SHEETS_URL, JWT_BEARER_GRANT,
    };

    const TEST_KEY: &str = include_str!("../testdata/service_account_key.pem");
    const TEST_PUBLIC_KEY: &str = include_str!("../testdata/service_account_key.pub.pem");

    #[derive(Debug, Deserialize)]
    struct SignedClaims {
        iss: String,
        scope: String,
    }

    struct Fixed(Vec<Team>);

    impl TeamsSource for Fixed {
        fn fetch_teams(&self) -> BoxFuture<'_, Result<Vec<Team>, TeamsError>> {
            Box::pin(async move { Ok::<_, TeamsError>(self.0.clone()) })
        }
    }

    struct Failing;

    impl TeamsSource for Failing {
        fn fetch_teams(&self) -> BoxFuture<'_, Result<Vec<Team>, TeamsError>> {
            Box::pin(async { Err::<Vec<Team>, _>(TeamsError::Status(503)) })
        }
    }

    fn sheets(base_url: &str, range: &str, auth: SheetsAuth) -> SheetsSource {
        SheetsSource::new(
            SheetsConfig {
                base_url: base_url.to_string(),
                sheet_id: "sheet".to_string(),
                range: range.to_string(),
                auth,
            },
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn configured_source_is_passed_through() {
        let team = Team {
            team_code: "A-01".to_string(),
            judul: "IoT for Monitoring".to_string(),
            ..Default::default()
        };
        let source: Arc<dyn TeamsSource> = Arc::new(Fixed(vec![team.clone()]));
        assert_eq!(load_teams(Some(&source)).await, vec![team]);
    }

    #[tokio::test]
    async fn failures_and_missing_config_yield_empty_list() {
        let source: Arc<dyn TeamsSource> = Arc::new(Failing);
        assert!(load_teams(Some(&source)).await.is_empty());
        assert!(load_teams(None).await.is_empty());
    }

    #[tokio::test]
    async fn unreachable_upstream_yields_empty_list() {
        // Nothing listens on port 9 of the loopback interface.
        let source: Arc<dyn TeamsSource> = Arc::new(sheets(
            "http://127.0.0.1:9",
            "A:Z",
            SheetsAuth::ApiKey("key".to_string()),
        ));
        assert!(load_teams(Some(&source)).await.is_empty());
    }

    #[test]
    fn values_url_escapes_the_range() {
        let key = || SheetsAuth::ApiKey("k".to_string());
        let base = format!("{DEFAULT_SHEETS_URL}/");
        let url = |range: &str| sheets(&base, range, key()).values_url().unwrap().to_string();

        assert_eq!(
            url("Team List!A:D"),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet/values/Team%20List!A:D"
        );
        assert_eq!(
            url("Teams#2!A:D"),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet/values/Teams%232!A:D"
        );
        assert_eq!(
            url("Q1/Q2!A:D"),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet/values/Q1%2FQ2!A:D"
        );
        assert!(sheets("not a url", "A:Z", key()).values_url().is_err());
    }

    #[test]
    fn private_key_escapes_are_unfolded() {
        let account = ServiceAccount::new("svc@example.iam", "line1\\nline2\\n", "http://t");
        assert_eq!(account.private_key, "line1\nline2\n");
        assert!(!format!("{account:?}").contains("line1"));
    }

    #[derive(Default)]
    struct Upstream {
        token_requests: AtomicUsize,
        token_url: String,
    }

    async fn token(
        State(upstream): State<Arc<Upstream>>,
        Form(form): Form<Vec<(String, String)>>,
    ) -> (StatusCode, Json<Value>) {
        upstream.token_requests.fetch_add(1, Ordering::SeqCst);
        let field = |name: &str| {
            form.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };
        if field("grant_type") != JWT_BEARER_GRANT {
            return (StatusCode::BAD_REQUEST, Json(json!({})));
        }

        let mut validation = Validation::new(jsonwebtoken::Algorithm::RS256);
        validation.set_audience(&[upstream.token_url.as_str()]);
        let key = DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap();
        match jsonwebtoken::decode::<SignedClaims>(&field("assertion"), &key, &validation) {
            Ok(data) if data.claims.iss == "svc@example.iam" && data.claims.scope.contains("spreadsheets") => (
                StatusCode::OK,
                Json(json!({"access_token": "tok-1", "expires_in": 3600, "token_type": "Bearer"})),
            ),
            _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
        }
    }

    async fn values(
        Path((sheet, range)): Path<(String, String)>,
        headers: HeaderMap,
    ) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer tok-1");
        if !authorized || sheet != "sheet" || range != "A:Z" {
            return (StatusCode::FORBIDDEN, Json(json!({})));
        }
        (
            StatusCode::OK,
            Json(json!({
                "range": "Sheet1!A1:D2",
                "majorDimension": "ROWS",
                "values": [
                    ["Team Code", "Judul", "Description", "Logo"],
                    ["A-01", "IoT for Monitoring", "Energy", ""]
                ]
            })),
        )
    }

    #[tokio::test]
    async fn service_account_token_is_fetched_once_and_reused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let upstream = Arc::new(Upstream {
            token_url: format!("{base}/token"),
            ..Default::default()
        });
        let app = Router::new()
            .route("/token", post(token))
            .route("/v4/spreadsheets/:sheet/values/:range", get(values))
            .with_state(upstream.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        // Keys from env files arrive with escaped newlines.
        let escaped_key = TEST_KEY.replace('\n', "\\n");
        let account = ServiceAccount::new("svc@example.iam", &escaped_key, upstream.token_url.clone());
        let source = sheets(&base, "A:Z", SheetsAuth::ServiceAccount(account));

        for _ in 0..2 {
            let teams = source.fetch_teams().await.unwrap();
            assert_eq!(teams.len(), 1);
            assert_eq!(teams[0].team_code, "A-01");
            assert_eq!(teams[0].judul, "IoT for Monitoring");
        }
        assert_eq!(upstream.token_requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_token_request_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let upstream = Arc::new(Upstream {
            // Assertions are signed for a different audience, so they fail validation.
            token_url: "https://oauth2.example/token".to_string(),
            ..Default::default()
        });
        let app = Router::new()
            .route("/token", post(token))
            .with_state(upstream.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let account = ServiceAccount::new("svc@example.iam", TEST_KEY, format!("{base}/token"));
        let source = sheets(&base, "A:Z", SheetsAuth::ServiceAccount(account));
        assert!(matches!(
            source.fetch_teams().await,
            Err(TeamsError::TokenStatus(401))
        ));
    }
}
