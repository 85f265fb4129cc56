// ── Variable view ──
//
// Flat key → value mapping exposed to the host. Every stream contributes
// its fields twice (keyed by id and by name); every platform contributes
// an enabled/status pair keyed by stream and platform name.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::{Platform, Stream};
use crate::store::Directory;

/// Value of a single host variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariableValue {
    Text(String),
    Flag(bool),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<bool> for VariableValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<&str> for VariableValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// A variable definition together with its current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub label: String,
    pub value: VariableValue,
}

impl Variable {
    pub fn new(label: impl Into<String>, value: VariableValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// The complete variable set, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableView(BTreeMap<String, Variable>);

impl VariableView {
    /// Insert under the sanitized form of `key`. A later insert with the
    /// same sanitized key overwrites the earlier one.
    pub fn insert(&mut self, key: &str, variable: Variable) {
        self.0.insert(sanitize_key(key), variable);
    }

    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.0.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&VariableValue> {
        self.0.get(key).map(|v| &v.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the view for every stream and platform in the directory.
    pub fn from_directory(directory: &Directory) -> Self {
        let mut view = Self::default();
        for stream in directory.streams() {
            view.add_stream_fields(&stream.id, stream);
            view.add_stream_fields(&stream.name, stream);
            for platform in &stream.platforms {
                view.add_platform_fields(stream, platform);
            }
        }
        view
    }

    fn add_stream_fields(&mut self, handle: &str, stream: &Stream) {
        let prefix = format!("stream_{handle}");
        let label = &stream.name;

        self.insert(
            &format!("{prefix}_name"),
            Variable::new(format!("Stream {handle}: name"), label.as_str().into()),
        );
        self.insert(
            &format!("{prefix}_enabled"),
            Variable::new(format!("Stream {handle}: enabled"), stream.enabled.into()),
        );
        self.insert(
            &format!("{prefix}_status"),
            Variable::new(
                format!("Stream {handle}: broadcasting status"),
                status_text(stream.broadcasting_status.as_deref()),
            ),
        );
        self.insert(
            &format!("{prefix}_ingest_server"),
            Variable::new(
                format!("Stream {handle}: ingest server"),
                stream.ingest_server.as_str().into(),
            ),
        );
        self.insert(
            &format!("{prefix}_ingest_key"),
            Variable::new(
                format!("Stream {handle}: ingest key"),
                stream.ingest_key.as_str().into(),
            ),
        );
    }

    fn add_platform_fields(&mut self, stream: &Stream, platform: &Platform) {
        let prefix = format!("stream_{}_platform_{}", stream.name, platform.name);
        let label = format!("{} / {}", stream.name, platform.name);

        self.insert(
            &format!("{prefix}_enabled"),
            Variable::new(format!("{label}: enabled"), platform.enabled.into()),
        );
        self.insert(
            &format!("{prefix}_status"),
            Variable::new(
                format!("{label}: broadcasting status"),
                status_text(platform.broadcasting_status.as_deref()),
            ),
        );
    }
}

fn status_text(status: Option<&str>) -> VariableValue {
    VariableValue::Text(status.unwrap_or_default().to_owned())
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Platform;
    use pretty_assertions::assert_eq;

    fn directory() -> Directory {
        Directory::from_streams(vec![
            Stream {
                id: "s1".into(),
                name: "A".into(),
                enabled: false,
                broadcasting_status: None,
                ingest_server: "rtmp://in".into(),
                ingest_key: "k1".into(),
                platforms: vec![],
            },
            Stream {
                id: "s2".into(),
                name: "My Show!".into(),
                enabled: true,
                broadcasting_status: Some("online".into()),
                ingest_server: String::new(),
                ingest_key: String::new(),
                platforms: vec![Platform {
                    id: "p1".into(),
                    name: "You Tube".into(),
                    enabled: true,
                    broadcasting_status: Some("live".into()),
                }],
            },
        ])
    }

    #[test]
    fn sanitize_replaces_disallowed_characters() {
        assert_eq!(sanitize_key("stream_My Show!_enabled"), "stream_My_Show__enabled");
        assert_eq!(sanitize_key("keep-dash_and_123"), "keep-dash_and_123");
        assert_eq!(sanitize_key("é/ü"), "___");
    }

    #[test]
    fn stream_fields_keyed_by_id_and_name() {
        let view = VariableView::from_directory(&directory());

        assert_eq!(view.value("stream_s1_enabled"), Some(&VariableValue::Flag(false)));
        assert_eq!(view.value("stream_A_enabled"), Some(&VariableValue::Flag(false)));
        assert_eq!(view.value("stream_s1_name"), Some(&VariableValue::from("A")));
        assert_eq!(view.value("stream_A_ingest_key"), Some(&VariableValue::from("k1")));
        assert_eq!(view.value("stream_s1_status"), Some(&VariableValue::from("")));
        assert_eq!(view.value("stream_My_Show__status"), Some(&VariableValue::from("online")));
    }

    #[test]
    fn platform_fields_keyed_by_names() {
        let view = VariableView::from_directory(&directory());

        assert_eq!(
            view.value("stream_My_Show__platform_You_Tube_enabled"),
            Some(&VariableValue::Flag(true))
        );
        assert_eq!(
            view.value("stream_My_Show__platform_You_Tube_status"),
            Some(&VariableValue::from("live"))
        );
    }

    #[test]
    fn key_count_matches_fields() {
        // 2 streams × 5 fields × 2 handles + 1 platform × 2 fields
        assert_eq!(VariableView::from_directory(&directory()).len(), 22);
    }

    #[test]
    fn values_render_as_strings() {
        assert_eq!(VariableValue::Flag(true).to_string(), "true");
        assert_eq!(VariableValue::Text("x".into()).to_string(), "x");
    }
}
