// ── Command API ──
//
// The two mutating operations exposed to the host. The service resolves
// the reference, computes the target state from the current directory,
// and issues one PATCH per affected record.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Requested state change.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnableMode {
    On,
    Off,
    Toggle,
}

impl EnableMode {
    /// Target flag for a record whose flag is currently `current`.
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Toggle => !current,
        }
    }

    /// Like [`apply`](Self::apply) for a record that may be unknown.
    /// Toggling an unknown record has no target.
    pub fn target(self, current: Option<bool>) -> Option<bool> {
        match (self, current) {
            (Self::Toggle, None) => None,
            (mode, current) => Some(mode.apply(current.unwrap_or_default())),
        }
    }
}

/// A mutating operation against the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `stream` is an id or a name, possibly templated.
    EnableStream { stream: String, mode: EnableMode },
    /// `platform` is a `"{streamName} :: {platformName|*ALL*}"` reference.
    EnablePlatform { platform: String, mode: EnableMode },
}

/// Outcome of one platform PATCH within a fan-out.
#[derive(Debug)]
pub struct PlatformOutcome {
    pub platform_id: String,
    pub enabled: bool,
    pub result: Result<(), CoreError>,
}

impl PlatformOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of a successfully dispatched [`Command`].
#[derive(Debug)]
pub enum CommandResult {
    Stream { stream_id: String, enabled: bool },
    Platforms {
        stream_id: String,
        outcomes: Vec<PlatformOutcome>,
    },
}

impl CommandResult {
    /// Number of records that were actually updated.
    pub fn applied(&self) -> usize {
        match self {
            Self::Stream { .. } => 1,
            Self::Platforms { outcomes, .. } => outcomes.iter().filter(|o| o.is_ok()).count(),
        }
    }

    /// Number of PATCHes that failed.
    pub fn failed(&self) -> usize {
        match self {
            Self::Stream { .. } => 0,
            Self::Platforms { outcomes, .. } => outcomes.iter().filter(|o| !o.is_ok()).count(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!(EnableMode::from_str("on").unwrap(), EnableMode::On);
        assert_eq!(EnableMode::from_str("TOGGLE").unwrap(), EnableMode::Toggle);
        assert_eq!(EnableMode::from_str("Off").unwrap(), EnableMode::Off);
        assert!(EnableMode::from_str("maybe").is_err());
        assert_eq!(EnableMode::Toggle.to_string(), "TOGGLE");
    }

    #[test]
    fn toggle_negates_current_state() {
        assert_eq!(EnableMode::Toggle.target(Some(false)), Some(true));
        assert_eq!(EnableMode::Toggle.target(Some(true)), Some(false));
        assert_eq!(EnableMode::Toggle.target(None), None);
        assert_eq!(EnableMode::On.target(None), Some(true));
        assert_eq!(EnableMode::Off.target(Some(false)), Some(false));
        assert!(EnableMode::Toggle.apply(false));
        assert!(!EnableMode::Off.apply(true));
    }

    #[test]
    fn applied_counts_successful_platforms() {
        let result = CommandResult::Platforms {
            stream_id: "s1".into(),
            outcomes: vec![
                PlatformOutcome {
                    platform_id: "p1".into(),
                    enabled: true,
                    result: Ok(()),
                },
                PlatformOutcome {
                    platform_id: "p2".into(),
                    enabled: true,
                    result: Err(CoreError::ConnectionFailed {
                        reason: "reset".into(),
                    }),
                },
            ],
        };
        assert_eq!(result.applied(), 1);
        assert_eq!(result.failed(), 1);
    }
}
