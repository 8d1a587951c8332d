//! Metric discovery: which (group, tag) pairs belong to a session.

use std::collections::BTreeSet;

use tracing::warn;

use crate::log::{DataClass, LogProvider, RunTagIndex};
use crate::schema::MetricName;

/// Discovers the metrics belonging to a session family by matching logged
/// run names against the session's root path.
///
/// A run belongs to session root `R` iff it equals `R` or starts with
/// `R + "/"`. This is a *path*-prefix, not a string-prefix:
/// `"exp/session_1xyz"` never matches root `"exp/session_1"`.
pub struct MetricCatalog<'a, P> {
    provider: &'a P,
    runs: &'a RunTagIndex,
}

impl<'a, P: LogProvider> MetricCatalog<'a, P> {
    /// Create a catalog over a snapshot of scalar-plugin runs.
    #[must_use]
    pub const fn new(provider: &'a P, runs: &'a RunTagIndex) -> Self {
        Self { provider, runs }
    }

    /// Collect the (group, tag) pairs for the session rooted at
    /// `session_name`.
    ///
    /// Only tags declared scalar-class are included. A tag whose metadata is
    /// missing, unreadable, or non-scalar is skipped with a log event;
    /// per-tag classification is the one place local recovery is allowed.
    pub async fn metrics_for_session(&self, session_name: &str) -> BTreeSet<MetricName> {
        let mut metrics = BTreeSet::new();
        for (run, tags) in self.runs {
            let Some(group) = session_group(session_name, run) else {
                continue;
            };
            for tag in tags.keys() {
                match self.provider.summary_metadata(run, tag).await {
                    Ok(Some(metadata)) if metadata.data_class() == DataClass::Scalar => {
                        metrics.insert(MetricName::new(group.clone(), tag.clone()));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(%run, %tag, error = %e, "skipping tag: metadata lookup failed");
                    }
                }
            }
        }
        metrics
    }
}

/// The group of `run` relative to session root `session`, or `None` when the
/// run is outside the session.
///
/// The empty group means the run *is* the session root.
fn session_group(session: &str, run: &str) -> Option<String> {
    if run == session {
        return Some(String::new());
    }
    run.strip_prefix(session)?
        .strip_prefix('/')
        .map(|group| group.trim_end_matches('/').to_string())
}
