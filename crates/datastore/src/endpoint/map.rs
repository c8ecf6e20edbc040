//! Endpoint-to-collection lookup table.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// One row of the lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMapping {
    /// Endpoint key, matched exactly or as a substring of the cleaned endpoint.
    pub prefix: String,
    /// Collection the key maps to.
    pub collection: String,
}

/// Ordered endpoint-to-collection table.
///
/// Order is significant: substring matches are tried in declaration order
/// and the first hit wins. Tables are immutable once built; share them with
/// an `Arc` if several resolvers need the same one.
///
/// # Examples
///
/// ```
/// use staffhub_datastore::endpoint::EndpointMap;
///
/// let map = EndpointMap::builder()
///     .map("leave-requests", "leaves")
///     .map("staff", "employees")
///     .build();
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.exact("staff"), Some("employees"));
/// assert_eq!(map.first_contained_in("staff/42"), Some("employees"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointMap {
    entries: Vec<EndpointMapping>,
}

impl EndpointMap {
    /// Returns a builder for a custom table.
    pub fn builder() -> EndpointMapBuilder {
        EndpointMapBuilder::default()
    }

    /// Builds a table from `(prefix, collection)` pairs, keeping their order.
    ///
    /// Pairs with an empty prefix are dropped: an empty key would be a
    /// substring of every endpoint.
    pub fn from_pairs<I, P, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::builder(), |builder, (prefix, collection)| {
                builder.map(prefix, collection)
            })
            .build()
    }

    /// The built-in table for the HR application.
    pub fn hr_defaults() -> Self {
        Self::from_pairs([
            ("employees", "employees"),
            ("employee-documents", "employeeDocuments"),
            ("departments", "departments"),
            ("leave-balances", "leaveBalances"),
            ("leave-types", "leaveTypes"),
            ("leaves", "leaves"),
            ("attendance", "attendance"),
            ("holidays", "holidays"),
            ("payroll", "payroll"),
            ("payslips", "payslips"),
            ("inventory", "inventory"),
            ("assets", "assets"),
            ("survey-responses", "surveyResponses"),
            ("surveys", "surveys"),
            ("permissions", "permissions"),
            ("roles", "roles"),
            ("users", "users"),
            ("performance", "performance"),
            ("announcements", "announcements"),
            ("notifications", "notifications"),
            ("dashboard", "dashboardStats"),
            ("settings", "settings"),
        ])
    }

    /// Loads a table from a JSON file holding `[{"prefix", "collection"}, ...]`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| StoreError::InvalidArgument {
            message: format!(
                "cannot read endpoint map {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        let entries: Vec<EndpointMapping> = serde_json::from_str(&raw)?;
        Ok(Self::from_pairs(
            entries.into_iter().map(|e| (e.prefix, e.collection)),
        ))
    }

    /// Returns the collection mapped to exactly `key`.
    pub fn exact(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.prefix == key)
            .map(|entry| entry.collection.as_str())
    }

    /// Returns the collection of the first entry whose key occurs in `endpoint`.
    pub fn first_contained_in(&self, endpoint: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| endpoint.contains(entry.prefix.as_str()))
            .map(|entry| entry.collection.as_str())
    }

    /// Iterates over the entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EndpointMapping> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`EndpointMap`].
#[derive(Debug, Default)]
pub struct EndpointMapBuilder {
    entries: Vec<EndpointMapping>,
}

impl EndpointMapBuilder {
    /// Appends a mapping. Empty prefixes are ignored.
    pub fn map(mut self, prefix: impl Into<String>, collection: impl Into<String>) -> Self {
        let prefix = prefix.into();
        if prefix.is_empty() {
            tracing::warn!("Ignoring endpoint mapping with an empty prefix");
            return self;
        }
        self.entries.push(EndpointMapping {
            prefix,
            collection: collection.into(),
        });
        self
    }

    /// Builds the table.
    pub fn build(self) -> EndpointMap {
        EndpointMap {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prefix_is_dropped() {
        let map = EndpointMap::from_pairs([("", "everything"), ("roles", "roles")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.first_contained_in("anything"), None);
    }

    #[test]
    fn test_first_contained_follows_declaration_order() {
        let map = EndpointMap::from_pairs([("leave", "first"), ("leaves", "second")]);
        assert_eq!(map.first_contained_in("leaves/1"), Some("first"));
        assert_eq!(map.exact("leaves"), Some("second"));
    }

    #[test]
    fn test_hr_defaults_have_no_shadowed_keys() {
        // A key that contains an earlier key could never be reached through a
        // substring match.
        let map = EndpointMap::hr_defaults();
        let keys: Vec<&str> = map.iter().map(|e| e.prefix.as_str()).collect();
        for (i, later) in keys.iter().enumerate() {
            for earlier in &keys[..i] {
                assert!(
                    !later.contains(earlier),
                    "'{}' is shadowed by '{}'",
                    later,
                    earlier
                );
            }
        }
    }

    #[test]
    fn test_deserialize_transparent() {
        let map: EndpointMap = serde_json::from_str(
            r#"[{"prefix": "staff", "collection": "employees"}]"#,
        )
        .unwrap();
        assert_eq!(map.exact("staff"), Some("employees"));
    }
}
