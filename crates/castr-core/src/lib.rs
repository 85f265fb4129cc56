//! Synchronization engine between a Castr account and a host control surface.
//!
//! - **[`SyncService`]**: Owns one account's state: polls the live-stream
//!   collection, rebuilds the [`Directory`], republishes derived views, and
//!   runs the enable/disable commands. Every rebuild is serialized through a
//!   single poll gate; background triggers coalesce in a one-slot queue.
//!
//! - **[`Directory`]**: Immutable snapshot of all streams, indexed by id and
//!   by name, plus the sorted `"{stream} :: {platform}"` reference list.
//!   Replaced wholesale on every successful poll.
//!
//! - **[`Resolver`]**: Turns user tokens (stream id, stream name, or compound
//!   platform reference, after template expansion) into concrete ids.
//!
//! - **[`ViewPublisher`]**: Computes the variable, action-choice, and
//!   feedback-choice views and forwards only the ones that changed.
//!
//! - **[`HostSurface`] / [`TemplateExpander`]**: The seams to the host that
//!   renders buttons, feedbacks, and variables.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod host;
pub mod model;
pub mod resolve;
pub mod status;
pub mod store;
pub mod views;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult, EnableMode, PlatformOutcome};
pub use config::SyncConfig;
pub use controller::SyncService;
pub use error::CoreError;
pub use host::{HostSurface, NullHost, TemplateExpander, VariableExpander, Verbatim};
pub use model::{Platform, PlatformReference, Stream, WILDCARD_PLATFORM};
pub use resolve::{ReferenceOptions, ResolvedPlatform, ResolvedTarget, Resolver};
pub use status::{ConnectionStatus, PollState, StatusReport};
pub use store::{Directory, DirectoryStore, PlatformChoice};
pub use views::{Choice, ChoiceSet, PublishReport, VariableValue, VariableView, ViewPublisher};
