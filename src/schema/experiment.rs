//! Experiment schema: the immutable aggregate handed back to callers.

use serde::{Deserialize, Serialize};

use super::{HparamInfo, MetricName};

/// The unified description of all hyperparameters and metrics across an
/// experiment's sessions.
///
/// Immutable once produced and carries no back-reference to the sessions
/// that produced it. Inferred schemas have `hparam_infos` sorted by name
/// (bytewise ascending) and `metric_infos` sorted by (group, tag); a
/// declared schema is passed through exactly as authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    hparam_infos: Vec<HparamInfo>,
    #[serde(default)]
    metric_infos: Vec<MetricName>,
}

impl ExperimentSchema {
    /// Create a builder for constructing a schema in a single step.
    #[must_use]
    pub fn builder() -> ExperimentSchemaBuilder {
        ExperimentSchemaBuilder::default()
    }

    /// Get the experiment description, if one was declared.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the hyperparameter descriptors.
    #[must_use]
    pub fn hparam_infos(&self) -> &[HparamInfo] {
        &self.hparam_infos
    }

    /// Get the metric descriptors.
    #[must_use]
    pub fn metric_infos(&self) -> &[MetricName] {
        &self.metric_infos
    }
}

/// Builder for [`ExperimentSchema`].
///
/// The schema is assembled exactly once, after the aggregation fold
/// completes; there is no partially-built schema visible to callers.
#[derive(Debug, Default)]
pub struct ExperimentSchemaBuilder {
    description: Option<String>,
    hparam_infos: Vec<HparamInfo>,
    metric_infos: Vec<MetricName>,
}

impl ExperimentSchemaBuilder {
    /// Set the experiment description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a hyperparameter descriptor.
    #[must_use]
    pub fn hparam_info(mut self, info: HparamInfo) -> Self {
        self.hparam_infos.push(info);
        self
    }

    /// Append a metric descriptor.
    #[must_use]
    pub fn metric_info(mut self, name: MetricName) -> Self {
        self.metric_infos.push(name);
        self
    }

    /// Build the `ExperimentSchema`.
    #[must_use]
    pub fn build(self) -> ExperimentSchema {
        ExperimentSchema {
            description: self.description,
            hparam_infos: self.hparam_infos,
            metric_infos: self.metric_infos,
        }
    }
}
