// ── Stream domain types ──

use serde::{Deserialize, Serialize};

/// A live stream and the destination platforms it fans out to.
///
/// `id` is the durable key. `name` is a mutable human label and is not
/// guaranteed to be unique across the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub broadcasting_status: Option<String>,
    pub ingest_server: String,
    pub ingest_key: String,
    /// Owned exclusively by this stream, in API order.
    pub platforms: Vec<Platform>,
}

impl Stream {
    /// Platforms whose name is exactly `name`. Duplicate names all match.
    pub fn platforms_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Platform> {
        self.platforms.iter().filter(move |p| p.name == name)
    }
}

/// A single destination attached to one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub broadcasting_status: Option<String>,
}
