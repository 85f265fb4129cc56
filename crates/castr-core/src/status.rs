// ── Connection status and poll state ──
//
// The host shows one status indicator per instance. Every remote call
// outcome is classified into a `ConnectionStatus`; the tracker forwards
// only transitions.

use std::fmt;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::CoreError;

/// Health of the link to the Castr API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Unknown,
    Connecting,
    Ok,
    AuthenticationFailure,
    ConnectionFailure,
    UnknownError,
}

impl ConnectionStatus {
    /// Map a failed call onto the status the host should display.
    pub fn from_error(err: &CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { .. } => Self::AuthenticationFailure,
            CoreError::ConnectionFailed { .. } => Self::ConnectionFailure,
            _ => Self::UnknownError,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

/// Status plus an optional human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub status: ConnectionStatus,
    pub message: Option<String>,
}

impl StatusReport {
    pub fn new(status: ConnectionStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }

    pub fn with_message(status: ConnectionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    pub fn from_error(err: &CoreError) -> Self {
        Self::with_message(ConnectionStatus::from_error(err), err.to_string())
    }
}

impl Default for StatusReport {
    fn default() -> Self {
        Self::new(ConnectionStatus::Unknown)
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(m) => write!(f, "{}: {m}", self.status),
            None => write!(f, "{}", self.status),
        }
    }
}

/// Lifecycle of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PollState {
    /// Not started, or shut down.
    Idle,
    /// A fetch is in flight.
    Polling,
    /// The last poll succeeded.
    Ready,
    /// The last poll failed; the previous directory is still served.
    Failed,
}

// ── Tracker ──────────────────────────────────────────────────────────

/// Deduplicating holder of the current [`StatusReport`].
pub(crate) struct StatusTracker {
    tx: watch::Sender<StatusReport>,
}

impl StatusTracker {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(StatusReport::default());
        Self { tx }
    }

    /// Store `next`; returns `true` if it differs from the current report.
    pub(crate) fn set(&self, next: StatusReport) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    pub(crate) fn current(&self) -> StatusReport {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<StatusReport> {
        self.tx.subscribe()
    }
}
