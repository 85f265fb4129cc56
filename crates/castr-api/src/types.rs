// Wire types for the Castr v2 `live_streams` resource.
//
// The collection endpoint wraps records in a `{ docs: [...] }` page. Records
// are kept as raw JSON at the page level so that one malformed entry does not
// fail the whole response; callers decode each record with `LiveStream::from_value`.

use serde::{Deserialize, Serialize};

/// Response page of `GET live_streams`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LiveStreamPage {
    #[serde(default)]
    pub docs: Vec<serde_json::Value>,
}

/// A live stream as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LiveStream {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(
        default,
        rename = "broadcasting_status",
        alias = "broadcastingStatus"
    )]
    pub broadcasting_status: Option<String>,
    #[serde(default)]
    pub ingest: Ingest,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

impl LiveStream {
    /// Decode a single record from a [`LiveStreamPage`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// RTMP ingest endpoint of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ingest {
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub key: String,
}

/// A destination platform attached to a stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Platform {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(
        default,
        rename = "broadcasting_status",
        alias = "broadcastingStatus"
    )]
    pub broadcasting_status: Option<String>,
}

/// Body of the enable/disable PATCH calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnabledPatch {
    pub enabled: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_snake_case_record() {
        let raw = json!({
            "_id": "s1",
            "name": "Main",
            "enabled": true,
            "broadcasting_status": "online",
            "ingest": { "server": "rtmp://live.castr.io/static", "key": "live_abc" },
            "platforms": [
                { "_id": "p1", "name": "YouTube", "enabled": false }
            ]
        });

        let stream = LiveStream::from_value(raw).unwrap();
        assert_eq!(stream.id, "s1");
        assert_eq!(stream.broadcasting_status.as_deref(), Some("online"));
        assert_eq!(stream.ingest.key, "live_abc");
        assert_eq!(stream.platforms.len(), 1);
        assert!(!stream.platforms[0].enabled);
        assert_eq!(stream.platforms[0].broadcasting_status, None);
    }

    #[test]
    fn accepts_camel_case_status_and_plain_id() {
        let raw = json!({
            "id": "s2",
            "name": "Backup",
            "broadcastingStatus": "offline"
        });

        let stream = LiveStream::from_value(raw).unwrap();
        assert_eq!(stream.id, "s2");
        assert!(!stream.enabled);
        assert_eq!(stream.broadcasting_status.as_deref(), Some("offline"));
        assert!(stream.platforms.is_empty());
        assert_eq!(stream.ingest, Ingest::default());
    }

    #[test]
    fn rejects_record_without_name() {
        assert!(LiveStream::from_value(json!({ "_id": "s3" })).is_err());
    }

    #[test]
    fn page_without_docs_is_empty() {
        let page: LiveStreamPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.docs.is_empty());
    }
}
