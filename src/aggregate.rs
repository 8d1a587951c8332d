//! Schema aggregation: the order-independent fold over session observations.
//!
//! ## Algorithm
//!
//! For every declared (name, value) pair across all sessions:
//!
//! 1. Look up or create the descriptor state for the name.
//! 2. Unify types: the first observation's type is adopted; any conflicting
//!    later observation widens the type to `STRING` and rewrites collected
//!    domain values to their canonical string form.
//! 3. Track distinct values (by canonical string) up to
//!    `max_domain_discrete_len`; strictly exceeding the cap discards the
//!    domain permanently — it is never re-enabled, even though later
//!    deduplication could bring the apparent count back under the cap.
//!
//! Metrics are the union of every session's catalog, deduplicated and sorted
//! by (group, tag).
//!
//! The fold is associative and commutative: [`SchemaAggregator::merge`]
//! combines partial per-session tallies into the same result regardless of
//! order, which is what makes parallel reduction safe.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::schema::{DataType, ExperimentSchema, HparamInfo, HparamValue, MetricName};
use crate::session::SessionRecord;

/// Discrete-domain tracking state for one hyperparameter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Domain {
    /// Still tracking distinct values.
    Discrete(BTreeSet<HparamValue>),
    /// Cap exceeded; the descriptor keeps only its type from here on.
    Unbounded,
}

/// Mutable per-name descriptor state during one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HparamState {
    data_type: DataType,
    domain: Domain,
}

impl HparamState {
    fn new(value: &HparamValue) -> Self {
        Self {
            data_type: value.data_type(),
            domain: Domain::Discrete(BTreeSet::new()),
        }
    }

    /// Widen the type to `unified`, rewriting collected values if it changed.
    fn widen_type(&mut self, unified: DataType) {
        if self.data_type == unified {
            return;
        }
        self.data_type = unified;
        if let Domain::Discrete(values) = &mut self.domain {
            *values = values.iter().map(HparamValue::widen_to_string).collect();
        }
    }

    fn insert(&mut self, value: HparamValue, cap: usize) {
        if let Domain::Discrete(values) = &mut self.domain {
            values.insert(value);
            if values.len() > cap {
                self.domain = Domain::Unbounded;
            }
        }
    }

    fn observe(&mut self, value: &HparamValue, cap: usize) {
        self.widen_type(self.data_type.unify(value.data_type()));
        let value = if self.data_type == value.data_type() {
            value.clone()
        } else {
            value.widen_to_string()
        };
        self.insert(value, cap);
    }

    fn merge(mut self, mut other: Self, cap: usize) -> Self {
        let unified = self.data_type.unify(other.data_type);
        self.widen_type(unified);
        other.widen_type(unified);
        match (&mut self.domain, other.domain) {
            (Domain::Discrete(values), Domain::Discrete(other_values)) => {
                for value in other_values {
                    self.insert(value, cap);
                }
            }
            (domain, _) => *domain = Domain::Unbounded,
        }
        self
    }
}

/// Folds sessions' hyperparameter observations and discovered metrics into
/// one [`ExperimentSchema`].
///
/// The output is independent of observation order: domains deduplicate by
/// canonical string, and everything is explicitly sorted when the schema is
/// built.
///
/// ## Example
///
/// ```rust
/// use hparam_schema::aggregate::SchemaAggregator;
/// use hparam_schema::schema::DataType;
/// use hparam_schema::session::SessionRecord;
///
/// let mut agg = SchemaAggregator::new(10);
/// agg.observe_session(&SessionRecord::builder().hparam("lr", 0.01).build());
/// agg.observe_session(&SessionRecord::builder().hparam("lr", 0.02).build());
///
/// let schema = agg.finish();
/// assert_eq!(schema.hparam_infos()[0].data_type(), DataType::Float64);
/// ```
#[derive(Debug)]
pub struct SchemaAggregator {
    max_domain_discrete_len: usize,
    hparams: FxHashMap<String, HparamState>,
    metrics: BTreeSet<MetricName>,
}

impl SchemaAggregator {
    /// Create an aggregator with the given discrete-domain cap.
    #[must_use]
    pub fn new(max_domain_discrete_len: usize) -> Self {
        Self {
            max_domain_discrete_len,
            hparams: FxHashMap::default(),
            metrics: BTreeSet::new(),
        }
    }

    /// Fold one observation into the descriptor state for `name`.
    pub fn observe(&mut self, name: &str, value: &HparamValue) {
        let cap = self.max_domain_discrete_len;
        self.hparams
            .entry(name.to_string())
            .or_insert_with(|| HparamState::new(value))
            .observe(value, cap);
    }

    /// Fold every hyperparameter declared by one session.
    ///
    /// A session with zero declared hyperparameters contributes nothing here
    /// but still contributes to metric discovery.
    pub fn observe_session(&mut self, session: &SessionRecord) {
        for (name, value) in session.hparams() {
            self.observe(name, value);
        }
    }

    /// Add one session's discovered metrics (union, deduplicated).
    pub fn add_metrics(&mut self, metrics: impl IntoIterator<Item = MetricName>) {
        self.metrics.extend(metrics);
    }

    /// Combine two partial tallies.
    ///
    /// Associative and commutative: unifying type A then B equals B then A,
    /// and domain-set union is commutative, so parallel reduction produces
    /// the same schema as a sequential fold.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        let cap = self.max_domain_discrete_len;
        for (name, other_state) in other.hparams {
            match self.hparams.remove(&name) {
                Some(state) => {
                    self.hparams.insert(name, state.merge(other_state, cap));
                }
                None => {
                    self.hparams.insert(name, other_state);
                }
            }
        }
        self.metrics.extend(other.metrics);
        self
    }

    /// Freeze the fold into an immutable schema.
    ///
    /// Descriptors are sorted by name, domains by the value total order, and
    /// metrics by (group, tag). A discrete domain is attached only when the
    /// unified type is `STRING` and the distinct-value count stayed within
    /// the cap; numeric and boolean hyperparameters are treated as
    /// continuous.
    #[must_use]
    pub fn finish(self) -> ExperimentSchema {
        let mut names: Vec<(String, HparamState)> = self.hparams.into_iter().collect();
        names.sort_by(|a, b| a.0.cmp(&b.0));

        let mut builder = ExperimentSchema::builder();
        for (name, state) in names {
            let mut info = HparamInfo::new(name, state.data_type);
            if state.data_type == DataType::String {
                if let Domain::Discrete(values) = state.domain {
                    info = info.with_domain(values.into_iter().collect());
                }
            }
            builder = builder.hparam_info(info);
        }
        for metric in self.metrics {
            builder = builder.metric_info(metric);
        }
        builder.build()
    }
}

/// Fold pre-fetched per-session data into a schema.
///
/// With the `parallel` feature, partial tallies are reduced with rayon; the
/// merge operator guarantees the result matches the sequential fold.
#[must_use]
pub fn aggregate_sessions(
    max_domain_discrete_len: usize,
    sessions: Vec<(SessionRecord, BTreeSet<MetricName>)>,
) -> ExperimentSchema {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        sessions
            .into_par_iter()
            .map(|(record, metrics)| {
                let mut agg = SchemaAggregator::new(max_domain_discrete_len);
                agg.observe_session(&record);
                agg.add_metrics(metrics);
                agg
            })
            .reduce(
                || SchemaAggregator::new(max_domain_discrete_len),
                SchemaAggregator::merge,
            )
            .finish()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut agg = SchemaAggregator::new(max_domain_discrete_len);
        for (record, metrics) in sessions {
            agg.observe_session(&record);
            agg.add_metrics(metrics);
        }
        agg.finish()
    }
}
