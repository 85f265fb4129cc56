use thiserror::Error;

/// Top-level error type for the `castr-api` crate.
///
/// Every outcome of a remote call that is not a success lands here:
/// rejected credentials, other non-success HTTP statuses, network-level
/// failures, and bodies that do not match the expected shape.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The API answered `401 Unauthorized`.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Remote API ──────────────────────────────────────────────────
    /// Any other non-success HTTP status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, reset).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the API rejected the configured credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` for network-level failures (no HTTP status received).
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport(e) => e.status().is_none(),
            _ => false,
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
