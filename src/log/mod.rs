//! Log Provider Contract
//!
//! The inference engine never touches raw log storage directly. It consumes
//! exactly two operations from a provider:
//!
//! - [`LogProvider::plugin_run_to_tag_to_content`]: every run logged under a
//!   plugin, with each run's tags and raw record bytes.
//! - [`LogProvider::summary_metadata`]: the declared metadata for one
//!   (run, tag) pair, used to classify a tag as scalar vs. tensor before it
//!   is admitted as a metric candidate.
//!
//! Any implementation can be substituted with a fake for unit tests;
//! [`MemoryLogStore`] is the in-memory implementation shipped with the crate.

mod memory;

pub use memory::MemoryLogStore;

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Plugin identifier for hyperparameter session records.
pub const HPARAMS_PLUGIN_NAME: &str = "hparams";

/// Plugin identifier for scalar metric series.
pub const SCALARS_PLUGIN_NAME: &str = "scalars";

/// Tag carrying a session's start-of-session record.
pub const SESSION_START_INFO_TAG: &str = "_hparams_/session_start_info";

/// Tag carrying a session's end-of-session record.
pub const SESSION_END_INFO_TAG: &str = "_hparams_/session_end_info";

/// Tag carrying a hand-authored experiment schema (pass-through override).
pub const EXPERIMENT_TAG: &str = "_hparams_/experiment";

/// run name -> tag name -> raw record bytes.
///
/// `BTreeMap` keeps enumeration order deterministic across fetches.
pub type RunTagIndex = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

/// Data class declared for a logged tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataClass {
    /// Scalar time series; the only class admitted as a metric.
    Scalar,
    /// Tensor-valued series (includes hparams plugin records).
    Tensor,
    /// Anything else (blobs, plugin-internal data).
    Other,
}

/// Declared metadata for one (run, tag) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    plugin_name: String,
    data_class: DataClass,
    content: Vec<u8>,
}

impl SummaryMetadata {
    /// Create metadata for a tag.
    #[must_use]
    pub fn new(plugin_name: impl Into<String>, data_class: DataClass, content: Vec<u8>) -> Self {
        Self {
            plugin_name: plugin_name.into(),
            data_class,
            content,
        }
    }

    /// Get the owning plugin's name.
    #[must_use]
    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    /// Get the declared data class.
    #[must_use]
    pub const fn data_class(&self) -> DataClass {
        self.data_class
    }

    /// Get the raw record bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Capability interface over the external log storage system.
///
/// The bulk fetch is the engine's only suspension point; retries are the
/// provider's own policy, not this crate's.
pub trait LogProvider: Send + Sync {
    /// Fetch every run logged under `plugin_name`, with each run's tags and
    /// their raw record bytes.
    fn plugin_run_to_tag_to_content(
        &self,
        plugin_name: &str,
    ) -> impl Future<Output = Result<RunTagIndex>> + Send;

    /// Fetch the declared metadata for one (run, tag) pair.
    ///
    /// Returns `None` when the pair was never logged.
    fn summary_metadata(
        &self,
        run: &str,
        tag: &str,
    ) -> impl Future<Output = Result<Option<SummaryMetadata>>> + Send;
}
