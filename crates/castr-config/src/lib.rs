//! Configuration for castr-sync.
//!
//! TOML file + `CASTR_` environment overrides, secret resolution
//! (env var → keyring → plaintext), and translation into
//! `castr_core::SyncConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use castr_core::SyncConfig;
use castr_core::config::MAX_POLL_INTERVAL_SECS;

/// Keyring service name under which secrets are stored.
pub const KEYRING_SERVICE: &str = "castr";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API secret configured for access token '{access_token}'")]
    NoCredentials { access_token: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub account: Account,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Namespace of `$(namespace:key)` placeholders in stream tokens.
    #[serde(default = "default_namespace")]
    pub variable_namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: Account::default(),
            timeout: default_timeout(),
            variable_namespace: default_namespace(),
        }
    }
}

/// The Castr account to synchronize.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    /// API access token (Basic-auth user).
    pub access_token: Option<String>,

    /// API secret (plaintext, prefer keyring or env var).
    pub secret: Option<String>,

    /// Environment variable name containing the API secret.
    pub secret_env: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Seconds between polls; `0` disables the timer.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            access_token: None,
            secret: None,
            secret_env: None,
            api_url: default_api_url(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_namespace() -> String {
    castr_core::config::DEFAULT_VARIABLE_NAMESPACE.into()
}
fn default_api_url() -> String {
    castr_core::config::DEFAULT_BASE_URL.into()
}
fn default_poll_interval() -> u64 {
    10
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "castr", "castr").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("castr");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from defaults, the TOML file (`path` or the platform
/// default), and `CASTR_*` environment variables, in that order.
///
/// Nested keys use a double underscore: `CASTR_ACCOUNT__POLL_INTERVAL=30`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("CASTR_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (or the platform
/// default), creating parent directories as needed.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, to_toml(cfg)?)?;
    Ok(path)
}

/// Render a config as pretty TOML.
pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API secret from the credential chain.
pub fn resolve_secret(account: &Account) -> Result<SecretString, ConfigError> {
    let access_token = account.access_token.clone().unwrap_or_default();

    // 1. Account's secret_env → env var lookup
    if let Some(val) = account
        .secret_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if !access_token.is_empty() {
        if let Some(secret) = keyring::Entry::new(KEYRING_SERVICE, &access_token)
            .ok()
            .and_then(|entry| entry.get_password().ok())
        {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref secret) = account.secret {
        return Ok(SecretString::from(secret.clone()));
    }

    Err(ConfigError::NoCredentials { access_token })
}

/// Validate a loaded Config and build the core's runtime `SyncConfig`.
pub fn to_sync_config(cfg: &Config) -> Result<SyncConfig, ConfigError> {
    let account = &cfg.account;

    let access_token = account
        .access_token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ConfigError::Validation {
            field: "account.access_token".into(),
            reason: "must be set".into(),
        })?;

    if account.poll_interval > MAX_POLL_INTERVAL_SECS {
        return Err(ConfigError::Validation {
            field: "account.poll_interval".into(),
            reason: format!(
                "must be between 0 and {MAX_POLL_INTERVAL_SECS} seconds, got {}",
                account.poll_interval
            ),
        });
    }

    let base_url: url::Url = account
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "account.api_url".into(),
            reason: format!("invalid URL: {}", account.api_url),
        })?;

    let secret = resolve_secret(account)?;

    Ok(SyncConfig {
        access_token,
        secret,
        base_url,
        poll_interval_secs: account.poll_interval,
        timeout: Duration::from_secs(cfg.timeout),
        variable_namespace: cfg.variable_namespace.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    fn account(token: &str) -> Account {
        Account {
            access_token: Some(token.into()),
            secret: Some("plain-secret".into()),
            ..Account::default()
        }
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
timeout = 5

[account]
access_token = "tok"
secret = "sek"
poll_interval = 0
"#,
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.timeout, 5);
        assert_eq!(cfg.account.access_token.as_deref(), Some("tok"));
        assert_eq!(cfg.account.poll_interval, 0);
        assert_eq!(cfg.account.api_url, "https://api.castr.com/v2/");
        assert_eq!(cfg.variable_namespace, "castr");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.account.poll_interval, 10);
        assert_eq!(cfg.account.access_token, None);
    }

    #[test]
    fn save_then_load_preserves_account() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            account: account("tok"),
            ..Config::default()
        };

        let written = save_config(&cfg, Some(&path)).unwrap();
        assert_eq!(written, path);
        assert_eq!(load_config(Some(&path)).unwrap(), cfg);
    }

    #[test]
    fn sync_config_carries_all_fields() {
        let cfg = Config {
            account: Account {
                poll_interval: 60,
                api_url: "https://example.test/v2".into(),
                ..account("tok-sync-config-test")
            },
            timeout: 7,
            variable_namespace: "cx".into(),
        };

        let sync = to_sync_config(&cfg).unwrap();
        assert_eq!(sync.access_token, "tok-sync-config-test");
        assert_eq!(sync.secret.expose_secret(), "plain-secret");
        assert_eq!(sync.poll_interval_secs, 60);
        assert_eq!(sync.timeout, Duration::from_secs(7));
        assert_eq!(sync.variable_namespace, "cx");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = Config {
            account: account("tok"),
            ..Config::default()
        };
        cfg.account.poll_interval = 3601;
        assert!(matches!(
            to_sync_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "account.poll_interval"
        ));

        cfg.account.poll_interval = 10;
        cfg.account.api_url = "not a url".into();
        assert!(matches!(
            to_sync_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "account.api_url"
        ));

        cfg.account.access_token = Some("  ".into());
        assert!(matches!(
            to_sync_config(&cfg),
            Err(ConfigError::Validation { ref field, .. }) if field == "account.access_token"
        ));
    }

    #[test]
    fn unset_secret_env_falls_through_to_plaintext() {
        let acct = Account {
            secret_env: Some("CASTR_TEST_SECRET_THAT_IS_NEVER_SET".into()),
            ..account("tok-fallthrough-test")
        };
        assert_eq!(resolve_secret(&acct).unwrap().expose_secret(), "plain-secret");
    }

    #[test]
    fn no_secret_anywhere_is_an_error() {
        let acct = Account {
            access_token: Some("tok-no-secret-test".into()),
            ..Account::default()
        };
        assert!(matches!(
            resolve_secret(&acct),
            Err(ConfigError::NoCredentials { .. })
        ));
    }
}
