//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use castr_config::ConfigError;
use castr_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Castr API")]
    #[diagnostic(
        code(castr::connection_failed),
        help("Check your network connection and `account.api_url`.\nReason: {reason}")
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(castr::auth_failed),
        help(
            "Verify the access token and secret in your Castr dashboard.\n\
             The secret is read from `account.secret_env`, the system keyring \
             (service \"castr\"), or `account.secret`, in that order."
        )
    )]
    AuthFailed { message: String },

    #[error("No API secret configured for access token '{access_token}'")]
    #[diagnostic(
        code(castr::no_credentials),
        help("Set `account.secret_env`, store the secret in the keyring, or set `account.secret`.")
    )]
    NoCredentials { access_token: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(castr::not_found),
        help("Run: castr streams  to see available streams and platform references")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(castr::api_error))]
    ApiError { code: String, message: String },

    #[error("{failed} of {total} platform updates failed")]
    #[diagnostic(code(castr::partial_failure), help("Re-run with -v to see each failure."))]
    PartialFailure { failed: usize, total: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(castr::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(castr::config))]
    Config(Box<figment::Error>),

    #[error("Could not write configuration: {0}")]
    #[diagnostic(code(castr::config_write))]
    ConfigWrite(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not serialize output: {0}")]
    #[diagnostic(code(castr::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::Api { message, status } => CliError::ApiError {
                code: status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                message,
            },
            CoreError::Parse { message } => CliError::ApiError {
                code: "parse".into(),
                message,
            },
            CoreError::StreamNotFound { identifier } => CliError::NotFound {
                resource_type: "stream".into(),
                identifier,
            },
            CoreError::PlatformNotFound { reference } => CliError::NotFound {
                resource_type: "platform reference".into(),
                identifier: reference,
            },
            CoreError::MissingReference { field } => CliError::Validation {
                field: field.into(),
                reason: "must not be empty".into(),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::ShutDown => CliError::ConnectionFailed {
                reason: "sync service was shut down".into(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { access_token } => CliError::NoCredentials { access_token },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
