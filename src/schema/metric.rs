//! Metric descriptor: (group, tag) relative to a session root.

use serde::{Deserialize, Serialize};

/// Identifies one logged scalar series relative to a session's root path.
///
/// `group` is the empty string when the metric is logged directly at the
/// session root. The derived ordering is (group, tag) lexicographic, which is
/// exactly the schema sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MetricName {
    group: String,
    tag: String,
}

impl MetricName {
    /// Create a metric name.
    #[must_use]
    pub fn new(group: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            tag: tag.into(),
        }
    }

    /// Get the group (run path below the session root, `""` at the root).
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Get the tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_name_accessors() {
        let name = MetricName::new("eval", "loss");
        assert_eq!(name.group(), "eval");
        assert_eq!(name.tag(), "loss");
    }

    #[test]
    fn test_metric_name_sort_key() {
        let mut names = vec![
            MetricName::new("train", "loss"),
            MetricName::new("", "loss"),
            MetricName::new("", "accuracy"),
            MetricName::new("eval", "loss"),
        ];
        names.sort();
        assert_eq!(names[0], MetricName::new("", "accuracy"));
        assert_eq!(names[1], MetricName::new("", "loss"));
        assert_eq!(names[2], MetricName::new("eval", "loss"));
        assert_eq!(names[3], MetricName::new("train", "loss"));
    }
}
