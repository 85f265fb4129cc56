// ── Action / feedback choice views ──

use serde::Serialize;

use crate::store::Directory;

/// One selectable entry of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

/// Choices for the stream selector and the platform-reference selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChoiceSet {
    /// One entry per stream, in API order: value is the id, label the name.
    pub streams: Vec<Choice>,
    /// Sorted compound references; value and label are both the reference.
    pub platforms: Vec<Choice>,
}

impl ChoiceSet {
    pub fn from_directory(directory: &Directory) -> Self {
        let streams = directory
            .streams()
            .iter()
            .map(|s| Choice {
                id: s.id.clone(),
                label: s.name.clone(),
            })
            .collect();

        let mut platforms: Vec<Choice> = directory
            .reference_strings()
            .map(|r| Choice {
                id: r.to_owned(),
                label: r.to_owned(),
            })
            .collect();
        // Platforms sharing a name yield identical references; a dropdown
        // needs unique values. The list is sorted, so duplicates are adjacent.
        platforms.dedup();

        Self { streams, platforms }
    }

    /// Default selection for the stream selector.
    pub fn default_stream(&self) -> Option<&str> {
        self.streams.first().map(|c| c.id.as_str())
    }

    /// Default selection for the platform selector.
    pub fn default_platform(&self) -> Option<&str> {
        self.platforms.first().map(|c| c.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Platform, Stream};

    fn platform(id: &str, name: &str) -> Platform {
        Platform {
            id: id.into(),
            name: name.into(),
            enabled: true,
            broadcasting_status: None,
        }
    }

    #[test]
    fn streams_in_api_order_and_platforms_sorted_unique() {
        let dir = Directory::from_streams(vec![
            Stream {
                id: "s2".into(),
                name: "Zed".into(),
                enabled: true,
                broadcasting_status: None,
                ingest_server: String::new(),
                ingest_key: String::new(),
                platforms: vec![platform("p1", "yt"), platform("p2", "yt")],
            },
            Stream {
                id: "s1".into(),
                name: "Abe".into(),
                enabled: true,
                broadcasting_status: None,
                ingest_server: String::new(),
                ingest_key: String::new(),
                platforms: vec![],
            },
        ]);

        let set = ChoiceSet::from_directory(&dir);
        let stream_ids: Vec<&str> = set.streams.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(stream_ids, ["s2", "s1"]);

        let refs: Vec<&str> = set.platforms.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(refs, ["Abe :: *ALL*", "Zed :: *ALL*", "Zed :: yt"]);
        assert_eq!(set.default_stream(), Some("s2"));
        assert_eq!(set.default_platform(), Some("Abe :: *ALL*"));
    }

    #[test]
    fn empty_directory_has_no_defaults() {
        let set = ChoiceSet::from_directory(&Directory::default());
        assert_eq!(set.default_stream(), None);
        assert_eq!(set.default_platform(), None);
    }
}
