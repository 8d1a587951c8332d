//! # hparam-schema: Experiment Schema Inference Engine
//!
//! Reconstructs a single consistent experiment schema — tunable
//! hyperparameters with inferred types and value domains, plus the set of
//! observed metrics — by scanning a large, unordered collection of per-run
//! logged data when no explicit schema was declared.
//!
//! The engine never touches raw log storage: it consumes a narrow
//! [`log::LogProvider`] capability (two operations) and hands back an
//! immutable [`schema::ExperimentSchema`].
//!
//! ## Design
//!
//! - **Order independence**: the fold over sessions is associative and
//!   commutative, so the inferred schema is identical for every session
//!   processing order (and safe to reduce in parallel).
//! - **Fail loudly**: a partial schema would be indistinguishable from a
//!   complete one, so caps and parse failures abort the whole operation.
//! - **Pass-through override**: a hand-authored schema, when declared, is
//!   returned as-is with no inference.
//!
//! ## Example
//!
//! ```rust
//! use hparam_schema::context::ExperimentContext;
//! use hparam_schema::log::MemoryLogStore;
//! use hparam_schema::session::SessionRecord;
//!
//! # async fn example() -> hparam_schema::Result<()> {
//! let store = MemoryLogStore::new();
//! let session = SessionRecord::builder()
//!     .hparam("batch_size", 100.0)
//!     .hparam("model_type", "CNN")
//!     .build();
//! store.log_session_start("exp/session_1", &session)?;
//! store.log_scalar("exp/session_1", "loss");
//! store.log_scalar("exp/session_1/eval", "loss");
//!
//! let ctx = ExperimentContext::new(store);
//! let schema = ctx.get_experiment("exp-123").await?;
//! assert_eq!(schema.hparam_infos().len(), 2);
//! assert_eq!(schema.metric_infos().len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod catalog;
pub mod context;
pub mod error;
pub mod log;
pub mod schema;
pub mod session;

pub use context::ExperimentContext;
pub use error::{Error, Result};
