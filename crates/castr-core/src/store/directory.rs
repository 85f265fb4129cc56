// ── Directory snapshot ──
//
// One immutable view of the account: every stream by id and by name, plus
// the sorted list of compound platform references offered to the host.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{PlatformReference, Stream};

/// One entry of the platform cross-reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformChoice {
    /// `"{streamName} :: {platformName}"` or `"{streamName} :: *ALL*"`.
    pub reference: String,
    pub stream_id: String,
    /// `None` for the wildcard entry.
    pub platform_id: Option<String>,
}

impl PlatformChoice {
    pub fn is_wildcard(&self) -> bool {
        self.platform_id.is_none()
    }
}

/// Snapshot of all streams known from the last successful poll.
///
/// Both lookup maps and the reference list are derived from the same
/// record list inside one constructor, so they can never disagree.
#[derive(Debug, Default)]
pub struct Directory {
    streams: Vec<Arc<Stream>>,
    by_id: HashMap<String, Arc<Stream>>,
    by_name: HashMap<String, Arc<Stream>>,
    references: Vec<PlatformChoice>,
}

impl Directory {
    /// Build a directory from decoded streams, in API order.
    ///
    /// A repeated id replaces the earlier record in place. Names may
    /// collide; the by-name lookup then resolves to the later stream.
    pub fn from_streams(streams: impl IntoIterator<Item = Stream>) -> Self {
        let mut ordered: Vec<Arc<Stream>> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();

        for stream in streams {
            let stream = Arc::new(stream);
            if let Some(&idx) = position.get(&stream.id) {
                tracing::warn!(stream_id = %stream.id, "duplicate stream id in response, keeping the later record");
                ordered[idx] = stream;
            } else {
                position.insert(stream.id.clone(), ordered.len());
                ordered.push(stream);
            }
        }

        let mut by_id = HashMap::with_capacity(ordered.len());
        let mut by_name = HashMap::with_capacity(ordered.len());
        let mut references = Vec::new();

        for stream in &ordered {
            by_id.insert(stream.id.clone(), Arc::clone(stream));
            if let Some(previous) = by_name.insert(stream.name.clone(), Arc::clone(stream)) {
                tracing::debug!(
                    name = %stream.name,
                    shadowed = %previous.id,
                    "stream name shared by several streams"
                );
            }

            references.push(PlatformChoice {
                reference: PlatformReference::wildcard(&stream.name).to_string(),
                stream_id: stream.id.clone(),
                platform_id: None,
            });
            for platform in &stream.platforms {
                references.push(PlatformChoice {
                    reference: PlatformReference::new(&stream.name, &platform.name).to_string(),
                    stream_id: stream.id.clone(),
                    platform_id: Some(platform.id.clone()),
                });
            }
        }

        references.sort_by(|a, b| a.reference.cmp(&b.reference));

        Self {
            streams: ordered,
            by_id,
            by_name,
            references,
        }
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn by_id(&self, id: &str) -> Option<&Arc<Stream>> {
        self.by_id.get(id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<Stream>> {
        self.by_name.get(name)
    }

    /// Streams in API order.
    pub fn streams(&self) -> &[Arc<Stream>] {
        &self.streams
    }

    /// Platform cross-reference table, sorted by reference string.
    pub fn references(&self) -> &[PlatformChoice] {
        &self.references
    }

    /// Sorted reference strings, as offered to the host.
    pub fn reference_strings(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(|r| r.reference.as_str())
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
