//! Filter normalization.
//!
//! UI forms hand the adapter loosely typed filter objects such as
//! `{"status": "pending", "department": "", "roles": ["admin"]}`. This module
//! turns them into an ordered list of typed [`Predicate`]s, dropping blank
//! entries and classifying each value.
//!
//! # Rules
//!
//! Entries are visited in the object's insertion order:
//!
//! | Value | Result |
//! |-------|--------|
//! | `null`, `""`, whitespace-only string | skipped |
//! | other string | `field == trimmed` |
//! | number | `field == number` |
//! | boolean | `field == boolean` |
//! | non-empty array | `field in [...]` |
//! | empty array, object | skipped |
//!
//! ```
//! use staffhub_datastore::filter::{normalize_filters, Predicate};
//! use serde_json::json;
//!
//! let predicates = normalize_filters(&json!({
//!     "status": "",
//!     "name": "  Jane  ",
//!     "age": 0,
//!     "tags": [],
//!     "roles": ["admin", "manager"]
//! }));
//!
//! assert_eq!(predicates.len(), 3);
//! assert_eq!(predicates[0], Predicate::string_eq("name", "Jane"));
//! assert_eq!(predicates[1].operator().as_str(), "==");
//! assert_eq!(predicates[2].operator().as_str(), "in");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equality (`==`).
    #[serde(rename = "==")]
    Eq,
    /// Set membership (`in`).
    #[serde(rename = "in")]
    In,
}

impl FilterOperator {
    /// Returns the operator as written in query predicates.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "==",
            FilterOperator::In => "in",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" => Ok(FilterOperator::Eq),
            "in" => Ok(FilterOperator::In),
            _ => Err(format!("unknown filter operator: {}", s)),
        }
    }
}

/// A single typed filter condition on a collection read.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field == "value"`; the value is trimmed and non-empty.
    StringEq { field: String, value: String },
    /// `field == number`.
    NumericEq { field: String, value: Number },
    /// `field == bool`.
    BooleanEq { field: String, value: bool },
    /// `field in [values]`; never empty.
    InSet { field: String, values: Vec<Value> },
}

impl Predicate {
    /// Builds a string equality predicate.
    pub fn string_eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::StringEq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Builds a numeric equality predicate.
    pub fn numeric_eq(field: impl Into<String>, value: impl Into<Number>) -> Self {
        Predicate::NumericEq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Builds a boolean equality predicate.
    pub fn boolean_eq(field: impl Into<String>, value: bool) -> Self {
        Predicate::BooleanEq {
            field: field.into(),
            value,
        }
    }

    /// Builds a set membership predicate.
    pub fn in_set(field: impl Into<String>, values: Vec<Value>) -> Self {
        Predicate::InSet {
            field: field.into(),
            values,
        }
    }

    /// Returns the filtered field.
    pub fn field(&self) -> &str {
        match self {
            Predicate::StringEq { field, .. }
            | Predicate::NumericEq { field, .. }
            | Predicate::BooleanEq { field, .. }
            | Predicate::InSet { field, .. } => field,
        }
    }

    /// Returns the comparison operator.
    pub fn operator(&self) -> FilterOperator {
        match self {
            Predicate::InSet { .. } => FilterOperator::In,
            _ => FilterOperator::Eq,
        }
    }

    /// Returns the compared value as JSON.
    pub fn value(&self) -> Value {
        match self {
            Predicate::StringEq { value, .. } => Value::String(value.clone()),
            Predicate::NumericEq { value, .. } => Value::Number(value.clone()),
            Predicate::BooleanEq { value, .. } => Value::Bool(*value),
            Predicate::InSet { values, .. } => Value::Array(values.clone()),
        }
    }
}

impl Serialize for Predicate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Predicate", 3)?;
        state.serialize_field("field", self.field())?;
        state.serialize_field("operator", &self.operator())?;
        state.serialize_field("value", &self.value())?;
        state.end()
    }
}

/// Normalizes a loosely typed filter object into predicates.
///
/// Anything other than a JSON object (including `null`) yields no
/// predicates.
pub fn normalize_filters(filters: &Value) -> Vec<Predicate> {
    match filters {
        Value::Object(map) => normalize_filter_map(map),
        _ => Vec::new(),
    }
}

/// Normalizes a filter map into predicates, preserving key order.
pub fn normalize_filter_map(filters: &Map<String, Value>) -> Vec<Predicate> {
    filters
        .iter()
        .filter_map(|(field, value)| normalize_entry(field, value))
        .collect()
}

fn normalize_entry(field: &str, value: &Value) -> Option<Predicate> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Predicate::string_eq(field, trimmed))
        }
        Value::Number(n) => Some(Predicate::numeric_eq(field, n.clone())),
        Value::Bool(b) => Some(Predicate::boolean_eq(field, *b)),
        Value::Array(items) if !items.is_empty() => {
            Some(Predicate::in_set(field, items.clone()))
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
