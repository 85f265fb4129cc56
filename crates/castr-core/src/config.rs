// ── Runtime sync configuration ──
//
// Describes *which* account to synchronize and *how often*. Carries
// credential data but never touches disk; `castr-config` builds one of
// these and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

pub use castr_api::DEFAULT_BASE_URL;

/// Upper bound for the poll interval, in seconds.
pub const MAX_POLL_INTERVAL_SECS: u64 = 3600;

pub const DEFAULT_VARIABLE_NAMESPACE: &str = "castr";

/// Configuration for synchronizing a single Castr account.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// API access token (Basic-auth user name).
    pub access_token: String,
    /// API secret (Basic-auth password).
    pub secret: SecretString,
    /// API root, e.g. `https://api.castr.com/v2/`.
    pub base_url: Url,
    /// Seconds between polls. `0` disables the timer; polls then happen
    /// only on (re)configuration and after successful commands.
    pub poll_interval_secs: u64,
    /// Request timeout.
    pub timeout: Duration,
    /// Namespace of `$(namespace:key)` placeholders expanded in tokens.
    pub variable_namespace: String,
}

impl SyncConfig {
    pub fn new(access_token: impl Into<String>, secret: SecretString) -> Self {
        Self {
            access_token: access_token.into(),
            secret,
            ..Self::default()
        }
    }

    /// Poll period, or `None` when polling is manual only.
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.poll_interval_secs > 0).then(|| Duration::from_secs(self.poll_interval_secs))
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.access_token.trim().is_empty() {
            return Err(CoreError::Config {
                message: "access token must not be empty".into(),
            });
        }
        if self.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(CoreError::Config {
                message: format!(
                    "poll interval must be between 0 and {MAX_POLL_INTERVAL_SECS} seconds, got {}",
                    self.poll_interval_secs
                ),
            });
        }
        Ok(())
    }

    pub(crate) fn credentials(&self) -> castr_api::Credentials {
        castr_api::Credentials::new(self.access_token.clone(), self.secret.clone())
    }

    pub(crate) fn transport(&self) -> castr_api::TransportConfig {
        castr_api::TransportConfig::default().with_timeout(self.timeout)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            secret: SecretString::from(String::new()),
            base_url: default_base_url(),
            poll_interval_secs: 10,
            timeout: Duration::from_secs(30),
            variable_namespace: DEFAULT_VARIABLE_NAMESPACE.to_owned(),
        }
    }
}

fn default_base_url() -> Url {
    match Url::parse(DEFAULT_BASE_URL) {
        Ok(url) => url,
        Err(_) => unreachable!("default API URL is valid"),
    }
}
