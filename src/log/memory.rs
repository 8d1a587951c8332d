//! In-memory log store implementation using `DashMap`.
//!
//! Serves two roles: the test fake demanded by the provider contract, and a
//! lightweight embedded backend for processes that log and infer in-process.

use std::collections::BTreeMap;

use dashmap::DashMap;

use super::{
    DataClass, LogProvider, RunTagIndex, SummaryMetadata, EXPERIMENT_TAG, HPARAMS_PLUGIN_NAME,
    SCALARS_PLUGIN_NAME, SESSION_START_INFO_TAG,
};
use crate::schema::ExperimentSchema;
use crate::session::SessionRecord;
use crate::{Error, Result};

/// In-memory log store backed by a lock-free concurrent hashmap.
///
/// Thread-safe; writers and the inference engine may run concurrently.
/// Data is lost on process restart.
///
/// # Example
///
/// ```rust
/// use hparam_schema::log::{LogProvider, MemoryLogStore, HPARAMS_PLUGIN_NAME};
/// use hparam_schema::session::SessionRecord;
///
/// # async fn example() -> hparam_schema::Result<()> {
/// let store = MemoryLogStore::new();
/// let record = SessionRecord::builder().hparam("lr", 0.01).build();
/// store.log_session_start("exp/session_1", &record)?;
///
/// let runs = store.plugin_run_to_tag_to_content(HPARAMS_PLUGIN_NAME).await?;
/// assert!(runs.contains_key("exp/session_1"));
/// # Ok(())
/// # }
/// ```
pub struct MemoryLogStore {
    entries: DashMap<(String, String), SummaryMetadata>,
}

impl MemoryLogStore {
    /// Create a new empty log store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Create with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
        }
    }

    /// Get the number of logged (run, tag) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Record arbitrary metadata for a (run, tag) pair, overwriting any
    /// previous entry.
    pub fn put_tag(&self, run: &str, tag: &str, metadata: SummaryMetadata) {
        self.entries
            .insert((run.to_string(), tag.to_string()), metadata);
    }

    /// Log a session-start record for `run`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the record fails to serialize.
    pub fn log_session_start(&self, run: &str, record: &SessionRecord) -> Result<()> {
        let content = serde_json::to_vec(record)
            .map_err(|e| Error::Internal(format!("session record failed to serialize: {e}")))?;
        self.put_tag(
            run,
            SESSION_START_INFO_TAG,
            SummaryMetadata::new(HPARAMS_PLUGIN_NAME, DataClass::Tensor, content),
        );
        Ok(())
    }

    /// Log a hand-authored experiment schema for `run` (pass-through override).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the schema fails to serialize.
    pub fn log_experiment(&self, run: &str, schema: &ExperimentSchema) -> Result<()> {
        let content = serde_json::to_vec(schema)
            .map_err(|e| Error::Internal(format!("experiment schema failed to serialize: {e}")))?;
        self.put_tag(
            run,
            EXPERIMENT_TAG,
            SummaryMetadata::new(HPARAMS_PLUGIN_NAME, DataClass::Tensor, content),
        );
        Ok(())
    }

    /// Register a scalar metric tag for `run`.
    ///
    /// Only tag presence matters for schema inference; no points are stored.
    pub fn log_scalar(&self, run: &str, tag: &str) {
        self.put_tag(
            run,
            tag,
            SummaryMetadata::new(SCALARS_PLUGIN_NAME, DataClass::Scalar, Vec::new()),
        );
    }
}

impl Default for MemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LogProvider for MemoryLogStore {
    async fn plugin_run_to_tag_to_content(&self, plugin_name: &str) -> Result<RunTagIndex> {
        let mut index = RunTagIndex::new();
        for entry in &self.entries {
            let ((run, tag), metadata) = (entry.key(), entry.value());
            if metadata.plugin_name() == plugin_name {
                index
                    .entry(run.clone())
                    .or_insert_with(BTreeMap::new)
                    .insert(tag.clone(), metadata.content().to_vec());
            }
        }
        Ok(index)
    }

    async fn summary_metadata(&self, run: &str, tag: &str) -> Result<Option<SummaryMetadata>> {
        Ok(self
            .entries
            .get(&(run.to_string(), tag.to_string()))
            .map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_empty() {
        let store = MemoryLogStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);

        let runs = store
            .plugin_run_to_tag_to_content(HPARAMS_PLUGIN_NAME)
            .await
            .unwrap();
        assert!(runs.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_filters_by_plugin() {
        let store = MemoryLogStore::new();
        let record = SessionRecord::builder().hparam("lr", 0.01).build();
        store.log_session_start("exp/session_1", &record).unwrap();
        store.log_scalar("exp/session_1", "loss");

        let hparams = store
            .plugin_run_to_tag_to_content(HPARAMS_PLUGIN_NAME)
            .await
            .unwrap();
        let scalars = store
            .plugin_run_to_tag_to_content(SCALARS_PLUGIN_NAME)
            .await
            .unwrap();

        assert!(hparams["exp/session_1"].contains_key(SESSION_START_INFO_TAG));
        assert!(!hparams["exp/session_1"].contains_key("loss"));
        assert!(scalars["exp/session_1"].contains_key("loss"));
    }

    #[tokio::test]
    async fn test_memory_store_metadata_lookup() {
        let store = MemoryLogStore::new();
        store.log_scalar("exp/session_1", "accuracy");

        let meta = store
            .summary_metadata("exp/session_1", "accuracy")
            .await
            .unwrap()
            .expect("metadata missing");
        assert_eq!(meta.data_class(), DataClass::Scalar);

        let missing = store
            .summary_metadata("exp/session_1", "loss")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_memory_store_overwrite() {
        let store = MemoryLogStore::new();
        store.put_tag(
            "run",
            "tag",
            SummaryMetadata::new(SCALARS_PLUGIN_NAME, DataClass::Tensor, Vec::new()),
        );
        store.log_scalar("run", "tag");

        let meta = store.summary_metadata("run", "tag").await.unwrap().unwrap();
        assert_eq!(meta.data_class(), DataClass::Scalar);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_clear() {
        let store = MemoryLogStore::new();
        store.log_scalar("run", "tag");
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
    }
}
