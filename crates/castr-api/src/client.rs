// Async HTTP client for the Castr REST API (v2).
//
// Base path: https://api.castr.com/v2/
// Auth: HTTP Basic (access token + secret)

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::Error;
use crate::auth::Credentials;
use crate::transport::TransportConfig;
use crate::types::{EnabledPatch, LiveStreamPage};

/// Default API root used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.castr.com/v2/";

const LIVE_STREAMS: &str = "live_streams";

// ── Error response shape from the API ────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Castr API.
///
/// Every request carries the account's Basic-auth header. Non-success
/// statuses are classified into [`Error::Authentication`] (401) and
/// [`Error::Api`] (everything else); network failures surface as
/// [`Error::Transport`]. Nothing is retried at this layer.
pub struct CastrClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl std::fmt::Debug for CastrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CastrClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &self.credentials.access_token)
            .finish_non_exhaustive()
    }
}

impl CastrClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL, credentials, and transport settings.
    pub fn new(
        base_url: &str,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http, credentials)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        base_url: &str,
        http: reqwest::Client,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// Ensure the base URL ends with `/` so relative joins append rather
    /// than replace the last path segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `base + endpoint [+ "/" + suffix]`
    fn url(&self, endpoint: &str, suffix: Option<&str>) -> Result<Url, Error> {
        let endpoint = endpoint.trim_matches('/');
        let path = match suffix {
            Some(suffix) if !suffix.is_empty() => {
                format!("{endpoint}/{}", suffix.trim_start_matches('/'))
            }
            _ => endpoint.to_owned(),
        };
        Ok(self.base_url.join(&path)?)
    }

    // ── Generic call ─────────────────────────────────────────────────

    /// Issue an authenticated request and return the parsed JSON body.
    ///
    /// An empty success body is returned as `Value::Null`.
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        suffix: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, Error> {
        let url = self.url(endpoint, suffix)?;
        debug!("{method} {url}");

        let mut builder = self.credentials.apply(self.http.request(method.clone(), url.clone()));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let outcome = match builder.send().await {
            Ok(resp) => Self::handle_response::<serde_json::Value>(resp).await,
            Err(e) => Err(Error::Transport(e)),
        };

        match &outcome {
            Ok(_) => debug!(%method, %url, "request succeeded"),
            Err(e) => warn!(%method, %url, error = %e, "request failed"),
        }
        outcome
    }

    // ── Live streams ─────────────────────────────────────────────────

    /// `GET live_streams`
    pub async fn list_live_streams(&self) -> Result<LiveStreamPage, Error> {
        let value = self.call(Method::GET, LIVE_STREAMS, None, None).await?;
        decode(value)
    }

    /// `PATCH live_streams/{stream_id}` with `{enabled}`.
    pub async fn set_stream_enabled(
        &self,
        stream_id: &str,
        enabled: bool,
    ) -> Result<serde_json::Value, Error> {
        let body = patch_body(enabled)?;
        self.call(Method::PATCH, LIVE_STREAMS, Some(stream_id), Some(&body))
            .await
    }

    /// `PATCH live_streams/{stream_id}/platforms/{platform_id}` with `{enabled}`.
    pub async fn set_platform_enabled(
        &self,
        stream_id: &str,
        platform_id: &str,
        enabled: bool,
    ) -> Result<serde_json::Value, Error> {
        let body = patch_body(enabled)?;
        let suffix = format!("{stream_id}/platforms/{platform_id}");
        self.call(Method::PATCH, LIVE_STREAMS, Some(&suffix), Some(&body))
            .await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            let body = if body.trim().is_empty() {
                "null".to_owned()
            } else {
                body
            };
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let status_text = status
            .canonical_reason()
            .map_or_else(|| status.to_string(), String::from);

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .unwrap_or(status_text);

        if status == reqwest::StatusCode::UNAUTHORIZED {
            Error::Authentication { message }
        } else {
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, Error> {
    serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

fn patch_body(enabled: bool) -> Result<serde_json::Value, Error> {
    serde_json::to_value(EnabledPatch { enabled }).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: String::new(),
    })
}
