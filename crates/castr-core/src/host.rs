// ── Host integration seams ──
//
// The host renders buttons, feedbacks, and variables; the sync service only
// tells it what changed. Template expansion is also delegated to the host.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::watch;

use crate::status::StatusReport;
use crate::views::{ChoiceSet, VariableView};

/// Receiver of derived views and connection status.
///
/// Calls arrive only when the corresponding value changed since the last
/// call, never for unchanged state.
pub trait HostSurface: Send + Sync {
    /// Replace the full variable set (definitions and values).
    fn publish_variables(&self, view: &VariableView);

    /// Replace the choices offered by the enable-stream/enable-platform actions.
    fn publish_action_choices(&self, choices: &ChoiceSet);

    /// Replace the choices offered by the stream/platform status feedbacks.
    fn publish_feedback_choices(&self, choices: &ChoiceSet);

    /// Re-evaluate feedbacks after the underlying state moved.
    fn check_feedbacks(&self) {}

    fn update_status(&self, status: &StatusReport);
}

/// Host that discards everything. Used for one-shot invocations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl HostSurface for NullHost {
    fn publish_variables(&self, _view: &VariableView) {}
    fn publish_action_choices(&self, _choices: &ChoiceSet) {}
    fn publish_feedback_choices(&self, _choices: &ChoiceSet) {}
    fn update_status(&self, _status: &StatusReport) {}
}

// ── Template expansion ───────────────────────────────────────────────

/// Expands user-entered text (which may contain variable placeholders)
/// into a literal string before it is resolved.
pub trait TemplateExpander: Send + Sync {
    fn expand<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, String>;
}

/// Returns its input unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Verbatim;

impl TemplateExpander for Verbatim {
    fn expand<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, String> {
        Box::pin(async move { raw.to_owned() })
    }
}

/// Substitutes `$(namespace:key)` placeholders with values from the most
/// recently published variable view.
///
/// Unknown keys in our namespace expand to the empty string. Placeholders
/// of other namespaces are left untouched.
pub struct VariableExpander {
    namespace: String,
    variables: watch::Receiver<Arc<VariableView>>,
}

impl VariableExpander {
    pub fn new(namespace: impl Into<String>, variables: watch::Receiver<Arc<VariableView>>) -> Self {
        Self {
            namespace: namespace.into(),
            variables,
        }
    }

    /// Synchronous core of [`TemplateExpander::expand`].
    pub fn expand_now(&self, raw: &str) -> String {
        let view = self.variables.borrow().clone();
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(start) = rest.find("$(") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find(')') else {
                out.push_str(&rest[start..]);
                return out;
            };

            let placeholder = &after[..end];
            match placeholder.split_once(':') {
                Some((ns, key)) if ns == self.namespace => {
                    if let Some(var) = view.get(key) {
                        out.push_str(&var.value.to_string());
                    }
                }
                _ => {
                    out.push_str("$(");
                    out.push_str(placeholder);
                    out.push(')');
                }
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }
}

impl TemplateExpander for VariableExpander {
    fn expand<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, String> {
        let expanded = self.expand_now(raw);
        Box::pin(async move { expanded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{Variable, VariableValue};

    fn expander() -> VariableExpander {
        let mut view = VariableView::default();
        view.insert(
            "stream_s1_name",
            Variable::new("Name of stream s1", VariableValue::Text("Main".into())),
        );
        view.insert(
            "stream_s1_enabled",
            Variable::new("Stream s1 enabled", VariableValue::Flag(true)),
        );
        let (_tx, rx) = watch::channel(Arc::new(view));
        VariableExpander::new("castr", rx)
    }

    #[test]
    fn substitutes_own_namespace() {
        let e = expander();
        assert_eq!(e.expand_now("$(castr:stream_s1_name) :: yt"), "Main :: yt");
        assert_eq!(e.expand_now("on=$(castr:stream_s1_enabled)"), "on=true");
    }

    #[test]
    fn unknown_key_expands_to_empty() {
        assert_eq!(expander().expand_now("[$(castr:nope)]"), "[]");
    }

    #[test]
    fn foreign_namespace_and_unclosed_placeholders_are_kept() {
        let e = expander();
        assert_eq!(e.expand_now("$(internal:time)"), "$(internal:time)");
        assert_eq!(e.expand_now("a $(castr:stream"), "a $(castr:stream");
        assert_eq!(e.expand_now("plain"), "plain");
    }

    #[tokio::test]
    async fn verbatim_returns_input() {
        assert_eq!(Verbatim.expand("$(castr:x)").await, "$(castr:x)");
    }
}
