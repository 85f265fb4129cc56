// ── Derived-view publisher ──
//
// Recomputes the three host-facing views from a directory snapshot and
// forwards only the ones that differ from what was last published.

mod cache;
mod choices;
mod variables;

use std::sync::Arc;

use tracing::debug;

pub use cache::ViewCache;
pub use choices::{Choice, ChoiceSet};
pub use variables::{Variable, VariableValue, VariableView, sanitize_key};

use crate::host::HostSurface;
use crate::store::Directory;

/// Which views were republished by one [`ViewPublisher::publish`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub variables: bool,
    pub action_choices: bool,
    pub feedback_choices: bool,
}

impl PublishReport {
    pub fn any(&self) -> bool {
        self.variables || self.action_choices || self.feedback_choices
    }
}

/// Owner of the three last-published view caches.
#[derive(Debug, Default)]
pub struct ViewPublisher {
    variables: ViewCache<Arc<VariableView>>,
    action_choices: ViewCache<ChoiceSet>,
    feedback_choices: ViewCache<ChoiceSet>,
}

impl ViewPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute all views from `directory` and hand the changed ones to `host`.
    ///
    /// A changed variable view also triggers a feedback re-check, since
    /// feedback state is derived from the same records.
    pub fn publish(&mut self, directory: &Directory, host: &dyn HostSurface) -> PublishReport {
        let mut report = PublishReport::default();

        let variables = Arc::new(VariableView::from_directory(directory));
        if let Some(view) = self.variables.offer(variables) {
            debug!(count = view.len(), "publishing variables");
            host.publish_variables(view);
            report.variables = true;
        }

        let choices = ChoiceSet::from_directory(directory);
        if let Some(set) = self.action_choices.offer(choices.clone()) {
            debug!(
                streams = set.streams.len(),
                platforms = set.platforms.len(),
                "publishing action choices"
            );
            host.publish_action_choices(set);
            report.action_choices = true;
        }
        if let Some(set) = self.feedback_choices.offer(choices) {
            debug!("publishing feedback choices");
            host.publish_feedback_choices(set);
            report.feedback_choices = true;
        }

        if report.variables {
            host.check_feedbacks();
        }
        report
    }

    /// The last variable view handed to the host.
    pub fn current_variables(&self) -> Arc<VariableView> {
        self.variables.current().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::model::Stream;
    use crate::status::StatusReport;

    #[derive(Default)]
    struct CountingHost {
        calls: Mutex<Vec<&'static str>>,
    }

    impl CountingHost {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        fn record(&self, what: &'static str) {
            if let Ok(mut c) = self.calls.lock() {
                c.push(what);
            }
        }
    }

    impl HostSurface for CountingHost {
        fn publish_variables(&self, _view: &VariableView) {
            self.record("variables");
        }
        fn publish_action_choices(&self, _choices: &ChoiceSet) {
            self.record("actions");
        }
        fn publish_feedback_choices(&self, _choices: &ChoiceSet) {
            self.record("feedbacks");
        }
        fn check_feedbacks(&self) {
            self.record("check");
        }
        fn update_status(&self, _status: &StatusReport) {}
    }

    fn stream(enabled: bool) -> Stream {
        Stream {
            id: "s1".into(),
            name: "A".into(),
            enabled,
            broadcasting_status: None,
            ingest_server: String::new(),
            ingest_key: String::new(),
            platforms: vec![],
        }
    }

    #[test]
    fn unchanged_directory_publishes_once() {
        let host = CountingHost::default();
        let mut publisher = ViewPublisher::new();

        let first = publisher.publish(&Directory::from_streams(vec![stream(true)]), &host);
        let second = publisher.publish(&Directory::from_streams(vec![stream(true)]), &host);

        assert!(first.any());
        assert!(!second.any());
        assert_eq!(host.calls(), ["variables", "actions", "feedbacks", "check"]);
    }

    #[test]
    fn value_change_republishes_only_variables() {
        let host = CountingHost::default();
        let mut publisher = ViewPublisher::new();

        publisher.publish(&Directory::from_streams(vec![stream(true)]), &host);
        let report = publisher.publish(&Directory::from_streams(vec![stream(false)]), &host);

        assert_eq!(
            report,
            PublishReport {
                variables: true,
                action_choices: false,
                feedback_choices: false,
            }
        );
        assert_eq!(
            publisher.current_variables().value("stream_s1_enabled"),
            Some(&VariableValue::Flag(false))
        );
    }
}
