// castr-api: Async Rust client for the Castr live-streaming REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::{CastrClient, DEFAULT_BASE_URL};
pub use error::Error;
pub use reqwest::Method;
pub use transport::TransportConfig;
pub use types::{Ingest, LiveStream, LiveStreamPage, Platform};
