//! Collection query types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::{Predicate, normalize_filters};

/// Sort direction for an ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("unknown sort direction: {}", s)),
        }
    }
}

/// An ordering clause: `{field, direction}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field to order by.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl OrderBy {
    /// Ascending order on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending order on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parses `field`, `field:asc`, `field:desc` or `-field`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(field) = s.strip_prefix('-') {
            return (!field.is_empty()).then(|| Self::desc(field));
        }
        match s.split_once(':') {
            Some((field, direction)) if !field.is_empty() => {
                direction.parse().ok().map(|direction| Self {
                    field: field.to_string(),
                    direction,
                })
            }
            Some(_) => None,
            None => (!s.is_empty()).then(|| Self::asc(s)),
        }
    }
}

/// Caller-facing options for a collection read.
///
/// `filters` is the loosely typed object produced by UI forms; it is
/// normalized into predicates when the read is issued.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Candidate filters (`{field: value}`), normalized before use.
    #[serde(default)]
    pub filters: Value,
    /// Optional ordering clause.
    #[serde(default, rename = "orderBy")]
    pub order_by: Option<OrderBy>,
    /// Optional result cap.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl FetchOptions {
    /// Creates empty fetch options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter object.
    pub fn with_filters(mut self, filters: Value) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the ordering clause.
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Sets the result cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builds the backend query for these options.
    pub fn to_query(&self) -> CollectionQuery {
        CollectionQuery {
            predicates: normalize_filters(&self.filters),
            order_by: self.order_by.clone(),
            limit: self.limit,
        }
    }
}

/// A normalized read against one collection, as handed to a backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionQuery {
    /// Predicates, combined with AND.
    pub predicates: Vec<Predicate>,
    /// Optional ordering clause.
    #[serde(rename = "orderBy", skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    /// Optional result cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl CollectionQuery {
    /// A query returning every document of the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds a predicate.
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Sets the ordering clause.
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Sets the result cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
