// ── API-to-domain type conversions ──
//
// Bridges raw `castr_api` wire records into canonical `castr_core::model`
// types. Decoding happens one record at a time so a single malformed
// entry can be skipped without discarding the rest of the page.

use castr_api::types;

use crate::error::CoreError;
use crate::model::{Platform, Stream};

impl From<types::Platform> for Platform {
    fn from(p: types::Platform) -> Self {
        Platform {
            id: p.id,
            name: p.name,
            enabled: p.enabled,
            broadcasting_status: p.broadcasting_status,
        }
    }
}

impl From<types::LiveStream> for Stream {
    fn from(s: types::LiveStream) -> Self {
        Stream {
            id: s.id,
            name: s.name,
            enabled: s.enabled,
            broadcasting_status: s.broadcasting_status,
            ingest_server: s.ingest.server,
            ingest_key: s.ingest.key,
            platforms: s.platforms.into_iter().map(Platform::from).collect(),
        }
    }
}

/// Decode one raw `docs[]` entry into a [`Stream`].
pub fn stream_from_value(value: serde_json::Value) -> Result<Stream, CoreError> {
    let hint = value
        .get("_id")
        .or_else(|| value.get("id"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);

    types::LiveStream::from_value(value)
        .map(Stream::from)
        .map_err(|e| CoreError::Parse {
            message: match hint {
                Some(id) => format!("record {id}: {e}"),
                None => e.to_string(),
            },
        })
}
