//! Experiment Schema Data Model
//!
//! The types in this module form the unit returned to callers:
//!
//! ```text
//! ExperimentSchema ──< HparamInfo (sorted by name)
//!                 └──< MetricName (sorted by (group, tag))
//! HparamInfo ──< HparamValue (optional discrete domain, sorted)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use hparam_schema::schema::{DataType, ExperimentSchema, HparamInfo, MetricName};
//!
//! let schema = ExperimentSchema::builder()
//!     .hparam_info(
//!         HparamInfo::new("model_type", DataType::String)
//!             .with_domain(vec!["CNN".into(), "LATTICE".into()]),
//!     )
//!     .metric_info(MetricName::new("", "accuracy"))
//!     .build();
//!
//! assert_eq!(schema.hparam_infos().len(), 1);
//! ```

mod experiment;
mod hparam;
mod metric;
mod value;

pub use experiment::{ExperimentSchema, ExperimentSchemaBuilder};
pub use hparam::HparamInfo;
pub use metric::MetricName;
pub use value::{DataType, HparamValue};
