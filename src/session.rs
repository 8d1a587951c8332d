//! Session start records: one run's declared hyperparameters and metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::HparamValue;
use crate::{Error, Result};

/// Declared lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No status was declared.
    Unknown,
    /// Session is still running.
    Running,
    /// Session completed successfully.
    Success,
    /// Session failed.
    Failure,
}

/// One run's declared start-of-session record.
///
/// Carries the hyperparameter assignment the run was launched with, plus
/// optional grouping and lifecycle metadata. Records are created transiently
/// while folding sessions into a schema; they are not persisted standalone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionRecord {
    hparams: BTreeMap<String, HparamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<SessionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time: Option<DateTime<Utc>>,
}

/// Wire shape of a session-start record before hparam values are validated.
///
/// Values arrive as raw JSON; anything other than a number, string, or bool
/// is rejected with `InvalidArgument` rather than silently coerced.
#[derive(Debug, Deserialize)]
struct RawSessionRecord {
    #[serde(default)]
    hparams: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    group_name: Option<String>,
    #[serde(default)]
    status: Option<SessionStatus>,
    #[serde(default)]
    start_time: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a builder for a session record.
    #[must_use]
    pub fn builder() -> SessionRecordBuilder {
        SessionRecordBuilder::default()
    }

    /// Parse a session-start record from raw logged bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::Internal`] if the record bytes fail to parse — an
    ///   unparseable session record means the provider handed back an
    ///   unexpected shape, and the whole experiment inference must fail.
    /// - [`Error::InvalidArgument`] if a hyperparameter value has a type the
    ///   union cannot represent (null, array, object, or a non-finite
    ///   JSON number).
    pub fn from_slice(run: &str, bytes: &[u8]) -> Result<Self> {
        let raw: RawSessionRecord = serde_json::from_slice(bytes).map_err(|e| {
            Error::Internal(format!(
                "session start record for run '{run}' failed to parse: {e}"
            ))
        })?;

        let mut hparams = BTreeMap::new();
        for (name, value) in raw.hparams {
            hparams.insert(name.clone(), hparam_value_from_json(run, &name, value)?);
        }

        Ok(Self {
            hparams,
            group_name: raw.group_name,
            status: raw.status,
            start_time: raw.start_time,
        })
    }

    /// Get the declared hyperparameter assignment.
    #[must_use]
    pub const fn hparams(&self) -> &BTreeMap<String, HparamValue> {
        &self.hparams
    }

    /// Get the declared session group name, if any.
    #[must_use]
    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }

    /// Get the declared status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<SessionStatus> {
        self.status
    }

    /// Get the declared start time, if any.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }
}

fn hparam_value_from_json(run: &str, name: &str, value: serde_json::Value) -> Result<HparamValue> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(HparamValue::Float64).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "hparam '{name}' in run '{run}' has a number outside the f64 range"
            ))
        }),
        serde_json::Value::String(s) => Ok(HparamValue::String(s)),
        serde_json::Value::Bool(b) => Ok(HparamValue::Bool(b)),
        other => Err(Error::InvalidArgument(format!(
            "hparam '{name}' in run '{run}' has unsupported value type: {other}"
        ))),
    }
}

/// Builder for [`SessionRecord`].
#[derive(Debug, Default)]
pub struct SessionRecordBuilder {
    hparams: BTreeMap<String, HparamValue>,
    group_name: Option<String>,
    status: Option<SessionStatus>,
    start_time: Option<DateTime<Utc>>,
}

impl SessionRecordBuilder {
    /// Declare one hyperparameter value.
    #[must_use]
    pub fn hparam(mut self, name: impl Into<String>, value: impl Into<HparamValue>) -> Self {
        self.hparams.insert(name.into(), value.into());
        self
    }

    /// Set the session group name.
    #[must_use]
    pub fn group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = Some(group_name.into());
        self
    }

    /// Set the declared status.
    #[must_use]
    pub const fn status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the declared start time.
    #[must_use]
    pub const fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Build the `SessionRecord`.
    #[must_use]
    pub fn build(self) -> SessionRecord {
        SessionRecord {
            hparams: self.hparams,
            group_name: self.group_name,
            status: self.status,
            start_time: self.start_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;

    #[test]
    fn test_builder_round_trip_through_bytes() {
        let record = SessionRecord::builder()
            .hparam("batch_size", 100.0)
            .hparam("model_type", "CNN")
            .hparam("use_dropout", true)
            .group_name("sweep_a")
            .status(SessionStatus::Running)
            .build();

        let bytes = serde_json::to_vec(&record).unwrap();
        let parsed = SessionRecord::from_slice("exp/session_1", &bytes).unwrap();

        assert_eq!(parsed, record);
        assert_eq!(parsed.hparams()["batch_size"].data_type(), DataType::Float64);
        assert_eq!(parsed.group_name(), Some("sweep_a"));
        assert_eq!(parsed.status(), Some(SessionStatus::Running));
    }

    #[test]
    fn test_empty_record_parses() {
        let parsed = SessionRecord::from_slice("run", b"{}").unwrap();
        assert!(parsed.hparams().is_empty());
        assert!(parsed.group_name().is_none());
    }

    #[test]
    fn test_malformed_record_is_internal_error() {
        let err = SessionRecord::from_slice("exp/session_1", b"not json").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert!(err.to_string().contains("exp/session_1"));
    }

    #[test]
    fn test_untyped_hparam_value_is_invalid_argument() {
        let bytes = br#"{"hparams": {"layers": [64, 64]}}"#;
        let err = SessionRecord::from_slice("run", bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("layers"));

        let bytes = br#"{"hparams": {"seed": null}}"#;
        let err = SessionRecord::from_slice("run", bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
