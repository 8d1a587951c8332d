//! Experiment context: the single entry point for schema lookup.
//!
//! `get_experiment` either passes through a hand-authored schema or drives
//! metric discovery and aggregation over every session of the experiment.

use std::collections::BTreeSet;

use tracing::debug;

use crate::aggregate::aggregate_sessions;
use crate::catalog::MetricCatalog;
use crate::log::{
    LogProvider, EXPERIMENT_TAG, HPARAMS_PLUGIN_NAME, SCALARS_PLUGIN_NAME, SESSION_START_INFO_TAG,
};
use crate::schema::ExperimentSchema;
use crate::session::SessionRecord;
use crate::{Error, Result};

/// Default cap on distinct values tracked per hyperparameter domain.
pub const DEFAULT_MAX_DOMAIN_DISCRETE_LEN: usize = 10;

/// Schema lookup over a log provider.
///
/// ## Example
///
/// ```rust
/// use hparam_schema::context::ExperimentContext;
/// use hparam_schema::log::MemoryLogStore;
/// use hparam_schema::session::SessionRecord;
///
/// # async fn example() -> hparam_schema::Result<()> {
/// let store = MemoryLogStore::new();
/// let record = SessionRecord::builder().hparam("lr", 0.01).build();
/// store.log_session_start("exp/session_1", &record)?;
/// store.log_scalar("exp/session_1", "loss");
///
/// let ctx = ExperimentContext::new(store);
/// let schema = ctx.get_experiment("exp-123").await?;
/// assert_eq!(schema.hparam_infos()[0].name(), "lr");
/// # Ok(())
/// # }
/// ```
pub struct ExperimentContext<P> {
    provider: P,
    max_domain_discrete_len: usize,
    allowed_experiment_ids: Option<BTreeSet<String>>,
    max_sessions: Option<usize>,
}

impl<P: LogProvider> ExperimentContext<P> {
    /// Create a context with default configuration.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::builder(provider).build()
    }

    /// Create a builder for a context with custom limits.
    #[must_use]
    pub fn builder(provider: P) -> ExperimentContextBuilder<P> {
        ExperimentContextBuilder {
            provider,
            max_domain_discrete_len: DEFAULT_MAX_DOMAIN_DISCRETE_LEN,
            allowed_experiment_ids: None,
            max_sessions: None,
        }
    }

    /// Return the experiment's schema: the declared one if present,
    /// otherwise inferred from all of its sessions.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`]: `experiment_id` not in the allow-list,
    ///   or a session declared an unrepresentable hyperparameter value.
    /// - [`Error::NotFound`]: no sessions and no declared schema.
    /// - [`Error::ResourceExhausted`]: more sessions than the configured cap.
    /// - [`Error::Internal`]: a session record or declared schema failed to
    ///   parse.
    pub async fn get_experiment(&self, experiment_id: &str) -> Result<ExperimentSchema> {
        if let Some(allowed) = &self.allowed_experiment_ids {
            if !allowed.contains(experiment_id) {
                return Err(Error::InvalidArgument(format!(
                    "experiment id '{experiment_id}' is not allowed"
                )));
            }
        }

        let hparam_runs = self
            .provider
            .plugin_run_to_tag_to_content(HPARAMS_PLUGIN_NAME)
            .await?;

        // Pass-through: a hand-authored schema overrides inference entirely.
        for (run, tags) in &hparam_runs {
            if let Some(content) = tags.get(EXPERIMENT_TAG) {
                debug!(%run, experiment_id, "returning declared experiment schema");
                return serde_json::from_slice(content).map_err(|e| {
                    Error::Internal(format!(
                        "declared experiment schema in run '{run}' failed to parse: {e}"
                    ))
                });
            }
        }

        let session_runs: Vec<&String> = hparam_runs
            .iter()
            .filter(|(_, tags)| tags.contains_key(SESSION_START_INFO_TAG))
            .map(|(run, _)| run)
            .collect();

        if session_runs.is_empty() {
            return Err(Error::NotFound(format!(
                "experiment '{experiment_id}' has no sessions and no declared schema"
            )));
        }
        if let Some(cap) = self.max_sessions {
            if session_runs.len() > cap {
                // Truncating here would yield a schema indistinguishable from
                // a complete one, so the whole operation fails instead.
                return Err(Error::ResourceExhausted(format!(
                    "experiment '{experiment_id}' has {} sessions, exceeding the cap of {cap}",
                    session_runs.len()
                )));
            }
        }

        let scalar_runs = self
            .provider
            .plugin_run_to_tag_to_content(SCALARS_PLUGIN_NAME)
            .await?;
        let catalog = MetricCatalog::new(&self.provider, &scalar_runs);

        let mut sessions = Vec::with_capacity(session_runs.len());
        for run in session_runs {
            let content = &hparam_runs[run][SESSION_START_INFO_TAG];
            let record = SessionRecord::from_slice(run, content)?;
            let metrics = catalog.metrics_for_session(run).await;
            sessions.push((record, metrics));
        }

        debug!(
            experiment_id,
            sessions = sessions.len(),
            "inferring experiment schema"
        );
        Ok(aggregate_sessions(self.max_domain_discrete_len, sessions))
    }
}

/// Builder for [`ExperimentContext`].
pub struct ExperimentContextBuilder<P> {
    provider: P,
    max_domain_discrete_len: usize,
    allowed_experiment_ids: Option<BTreeSet<String>>,
    max_sessions: Option<usize>,
}

impl<P: LogProvider> ExperimentContextBuilder<P> {
    /// Cap the number of distinct values tracked per hyperparameter domain.
    ///
    /// Must be positive; zero would discard every domain.
    #[must_use]
    pub const fn max_domain_discrete_len(mut self, len: usize) -> Self {
        self.max_domain_discrete_len = len;
        self
    }

    /// Restrict queries to the given experiment IDs.
    #[must_use]
    pub fn allowed_experiment_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_experiment_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Fail `get_experiment` when an experiment has more sessions than this.
    #[must_use]
    pub const fn max_sessions(mut self, cap: usize) -> Self {
        self.max_sessions = Some(cap);
        self
    }

    /// Build the `ExperimentContext`.
    #[must_use]
    pub fn build(self) -> ExperimentContext<P> {
        ExperimentContext {
            provider: self.provider,
            max_domain_discrete_len: self.max_domain_discrete_len,
            allowed_experiment_ids: self.allowed_experiment_ids,
            max_sessions: self.max_sessions,
        }
    }
}
