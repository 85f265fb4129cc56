// ── Core error types ──
//
// Errors surfaced by the synchronization engine. Transport-layer failures
// from `castr-api` are translated into the categories the host cares about:
// credentials rejected, remote unreachable, or the API refused the request.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote errors ────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot reach Castr API: {reason}")]
    ConnectionFailed { reason: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if one was received).
        status: Option<u16>,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed stream record: {message}")]
    Parse { message: String },

    #[error("Stream not found: {identifier}")]
    StreamNotFound { identifier: String },

    #[error("Platform reference could not be resolved: {reference}")]
    PlatformNotFound { reference: String },

    #[error("Missing {field} reference")]
    MissingReference { field: &'static str },

    // ── Configuration / lifecycle ────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Sync service is shut down")]
    ShutDown,
}

impl CoreError {
    /// Returns `true` for failures caused by the caller's reference token.
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::StreamNotFound { .. } | Self::PlatformNotFound { .. } | Self::MissingReference { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<castr_api::Error> for CoreError {
    fn from(err: castr_api::Error) -> Self {
        match err {
            castr_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            castr_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            castr_api::Error::Transport(ref e) => {
                if let Some(status) = e.status() {
                    CoreError::Api {
                        message: e.to_string(),
                        status: Some(status.as_u16()),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                }
            }
            castr_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            castr_api::Error::Client(message) => CoreError::Config { message },
            castr_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response: {message}"),
                status: None,
            },
        }
    }
}
