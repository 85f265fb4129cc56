// ── Directory rebuild from a poll response ──
//
// Each `docs[]` entry is decoded on its own. Failures are logged and
// skipped; the rebuild always completes with whatever decoded cleanly.

use tracing::warn;

use super::Directory;
use crate::convert::stream_from_value;
use crate::error::CoreError;

/// Outcome of one rebuild: how many records made it in and which ones
/// were dropped.
#[derive(Debug, Default)]
pub struct RebuildReport {
    pub accepted: usize,
    pub skipped: Vec<CoreError>,
}

impl Directory {
    /// Decode raw records and build a directory from the ones that parse.
    pub fn from_records(records: Vec<serde_json::Value>) -> (Self, RebuildReport) {
        let mut report = RebuildReport::default();
        let mut streams = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            match stream_from_value(record) {
                Ok(stream) => streams.push(stream),
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed stream record");
                    report.skipped.push(e);
                }
            }
        }

        report.accepted = streams.len();
        (Self::from_streams(streams), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let (dir, report) = Directory::from_records(vec![
            json!({ "_id": "s1", "name": "A", "enabled": false }),
            json!({ "name": "no id" }),
            json!({ "_id": "s2", "name": "B", "enabled": true, "platforms": [
                { "_id": "p1", "name": "yt", "enabled": true }
            ]}),
        ]);

        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(dir.by_id("s1").is_some());
        assert!(dir.by_name("B").is_some());
        assert!(matches!(report.skipped[0], CoreError::Parse { .. }));
    }

    #[test]
    fn empty_page_yields_empty_directory() {
        let (dir, report) = Directory::from_records(Vec::new());
        assert!(dir.is_empty());
        assert_eq!(report.accepted, 0);
        assert!(report.skipped.is_empty());
    }
}
