//! Hyperparameter descriptor: name, inferred type, optional discrete domain.

use serde::{Deserialize, Serialize};

use super::{DataType, HparamValue};

/// Descriptor for one hyperparameter across an experiment.
///
/// Created once per unique hyperparameter name during an aggregation pass
/// and frozen when the schema is built. `domain_discrete` is `None` when the
/// distinct-value count exceeded the configured cap (continuous/unbounded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HparamInfo {
    name: String,
    #[serde(rename = "type")]
    data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain_discrete: Option<Vec<HparamValue>>,
}

impl HparamInfo {
    /// Create a descriptor with no discrete domain.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            domain_discrete: None,
        }
    }

    /// Attach a discrete domain (values must already be sorted and distinct).
    #[must_use]
    pub fn with_domain(mut self, values: Vec<HparamValue>) -> Self {
        self.domain_discrete = Some(values);
        self
    }

    /// Get the hyperparameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the inferred data type.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Get the discrete domain, if the value set stayed under the cap.
    #[must_use]
    pub fn domain_discrete(&self) -> Option<&[HparamValue]> {
        self.domain_discrete.as_deref()
    }
}
