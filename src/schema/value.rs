//! Hyperparameter value union and inferred data types.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Inferred data type of a hyperparameter.
///
/// `String` is the universal fallback: any two conflicting types unify to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// 64-bit floating point
    Float64,
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
}

impl DataType {
    /// Unify two inferred types.
    ///
    /// Equal types unify to themselves; any conflict widens to `String`.
    /// Associative and commutative, so merge order never matters.
    #[must_use]
    pub fn unify(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            Self::String
        }
    }

    /// Tiebreak rank for the value total order.
    const fn rank(self) -> u8 {
        match self {
            Self::Float64 => 0,
            Self::String => 1,
            Self::Bool => 2,
        }
    }
}

/// One hyperparameter value: exactly one of f64, string, or bool.
///
/// Two values are *type-equal* iff their variant tags match. Equality and
/// ordering, by contrast, go through [`HparamValue::canonical_string`] so
/// that domain deduplication is stable across runs and discovery order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HparamValue {
    /// Numeric value
    Float64(f64),
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
}

impl HparamValue {
    /// The variant tag, used as the type-unification key.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Float64(_) => DataType::Float64,
            Self::String(_) => DataType::String,
            Self::Bool(_) => DataType::Bool,
        }
    }

    /// Deterministic string form of the value.
    ///
    /// Floats render with their shortest round-trip decimal representation
    /// (`100` becomes `"100.0"`), booleans render as `"true"`/`"false"`,
    /// strings render unchanged.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use hparam_schema::schema::HparamValue;
    ///
    /// assert_eq!(HparamValue::Float64(100.0).canonical_string(), "100.0");
    /// assert_eq!(HparamValue::Float64(0.01).canonical_string(), "0.01");
    /// assert_eq!(HparamValue::Bool(true).canonical_string(), "true");
    /// assert_eq!(HparamValue::String("CNN".into()).canonical_string(), "CNN");
    /// ```
    #[must_use]
    pub fn canonical_string(&self) -> String {
        match self {
            Self::Float64(v) => format!("{v:?}"),
            Self::String(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Convert to the string variant carrying the canonical form.
    ///
    /// Used when a descriptor's type widens to `String`: previously collected
    /// domain values are rewritten through this so the domain stays
    /// deduplicatable by canonical string.
    #[must_use]
    pub fn widen_to_string(&self) -> Self {
        match self {
            Self::String(_) => self.clone(),
            other => Self::String(other.canonical_string()),
        }
    }
}

impl PartialEq for HparamValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HparamValue {}

impl PartialOrd for HparamValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HparamValue {
    /// Total order: canonical string first, variant tag as tiebreak.
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_string()
            .cmp(&other.canonical_string())
            .then_with(|| self.data_type().rank().cmp(&other.data_type().rank()))
    }
}

impl From<f64> for HparamValue {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<bool> for HparamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for HparamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for HparamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_string_float() {
        assert_eq!(HparamValue::Float64(100.0).canonical_string(), "100.0");
        assert_eq!(HparamValue::Float64(0.01).canonical_string(), "0.01");
        assert_eq!(HparamValue::Float64(-2.5).canonical_string(), "-2.5");
    }

    #[test]
    fn test_canonical_string_bool_and_string() {
        assert_eq!(HparamValue::Bool(true).canonical_string(), "true");
        assert_eq!(HparamValue::Bool(false).canonical_string(), "false");
        assert_eq!(
            HparamValue::String("LATTICE".into()).canonical_string(),
            "LATTICE"
        );
    }

    #[test]
    fn test_type_unification_is_commutative() {
        for a in [DataType::Float64, DataType::String, DataType::Bool] {
            for b in [DataType::Float64, DataType::String, DataType::Bool] {
                assert_eq!(a.unify(b), b.unify(a));
            }
        }
        assert_eq!(DataType::Float64.unify(DataType::Bool), DataType::String);
        assert_eq!(DataType::Float64.unify(DataType::Float64), DataType::Float64);
    }

    #[test]
    fn test_ordering_by_canonical_string() {
        let mut values = vec![
            HparamValue::from("LATTICE"),
            HparamValue::from("CNN"),
            HparamValue::from(100.0),
        ];
        values.sort();
        assert_eq!(values[0].canonical_string(), "100.0");
        assert_eq!(values[1].canonical_string(), "CNN");
        assert_eq!(values[2].canonical_string(), "LATTICE");
    }

    #[test]
    fn test_widen_to_string() {
        let widened = HparamValue::Float64(100.0).widen_to_string();
        assert_eq!(widened, HparamValue::String("100.0".into()));
        assert_eq!(widened.data_type(), DataType::String);
    }

    #[test]
    fn test_untagged_deserialization() {
        let v: HparamValue = serde_json::from_str("100").unwrap();
        assert_eq!(v.data_type(), DataType::Float64);
        let v: HparamValue = serde_json::from_str("true").unwrap();
        assert_eq!(v.data_type(), DataType::Bool);
        let v: HparamValue = serde_json::from_str("\"CNN\"").unwrap();
        assert_eq!(v.data_type(), DataType::String);
    }
}
