//! Endpoint to collection resolution.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ResolveError;

use super::map::EndpointMap;
use super::path::{clean_endpoint, first_segment};

/// Collection used when an endpoint cannot be resolved.
pub const DEFAULT_COLLECTION: &str = "users";

/// How a collection name was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// The cleaned endpoint equals a table key.
    Exact,
    /// A table key occurs inside the cleaned endpoint.
    Substring,
    /// No table key matched; the first path segment was used.
    Segment,
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The collection to query.
    pub collection: String,
    /// Which lookup step produced it.
    pub matched_by: MatchKind,
}

/// Maps endpoint strings to collection names.
///
/// The lookup runs in three steps on the endpoint with its query string and
/// one leading `/` removed:
///
/// 1. exact match against the table;
/// 2. the first table key, in declaration order, contained in the endpoint;
/// 3. the endpoint's first path segment.
///
/// [`resolve`](Self::resolve) never fails: anything that cannot be resolved
/// maps to the default collection. [`try_resolve`](Self::try_resolve)
/// reports why instead.
///
/// # Examples
///
/// ```
/// use staffhub_datastore::endpoint::{EndpointMap, EndpointResolver, MatchKind};
///
/// let resolver = EndpointResolver::new(EndpointMap::hr_defaults());
///
/// assert_eq!(resolver.resolve("/leaves?status=pending"), "leaves");
/// assert_eq!(resolver.resolve("/leaves/abc123"), "leaves");
/// assert_eq!(resolver.resolve("/projects/42"), "projects");
/// assert_eq!(resolver.resolve(""), "users");
///
/// let resolution = resolver.try_resolve("/dashboard").unwrap();
/// assert_eq!(resolution.collection, "dashboardStats");
/// assert_eq!(resolution.matched_by, MatchKind::Exact);
/// ```
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    map: Arc<EndpointMap>,
    default_collection: String,
}

impl Default for EndpointResolver {
    fn default() -> Self {
        Self::new(EndpointMap::hr_defaults())
    }
}

impl EndpointResolver {
    /// Creates a resolver over `map` with the `"users"` default.
    pub fn new(map: impl Into<Arc<EndpointMap>>) -> Self {
        Self {
            map: map.into(),
            default_collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Overrides the fallback collection.
    pub fn with_default_collection(mut self, collection: impl Into<String>) -> Self {
        self.default_collection = collection.into();
        self
    }

    /// Returns the lookup table.
    pub fn map(&self) -> &EndpointMap {
        &self.map
    }

    /// Returns the fallback collection.
    pub fn default_collection(&self) -> &str {
        &self.default_collection
    }

    /// Resolves `endpoint`, reporting why resolution failed.
    pub fn try_resolve(&self, endpoint: &str) -> Result<Resolution, ResolveError> {
        if endpoint.is_empty() {
            return Err(ResolveError::EmptyEndpoint);
        }

        let cleaned = clean_endpoint(endpoint);

        if let Some(collection) = self.map.exact(cleaned) {
            return Ok(Resolution {
                collection: collection.to_string(),
                matched_by: MatchKind::Exact,
            });
        }

        if let Some(collection) = self.map.first_contained_in(cleaned) {
            return Ok(Resolution {
                collection: collection.to_string(),
                matched_by: MatchKind::Substring,
            });
        }

        let segment = first_segment(cleaned);
        if segment.is_empty() {
            return Err(ResolveError::EmptySegment {
                endpoint: endpoint.to_string(),
            });
        }

        Ok(Resolution {
            collection: segment.to_string(),
            matched_by: MatchKind::Segment,
        })
    }

    /// Resolves `endpoint`, falling back to the default collection.
    pub fn resolve(&self, endpoint: &str) -> String {
        match self.try_resolve(endpoint) {
            Ok(resolution) => resolution.collection,
            Err(e) => {
                tracing::debug!(
                    endpoint = %endpoint,
                    default = %self.default_collection,
                    "Endpoint not resolvable, using default collection: {}",
                    e
                );
                self.default_collection.clone()
            }
        }
    }

    /// Resolves a loosely typed endpoint value.
    ///
    /// Only JSON strings are endpoints; `null`, numbers and every other
    /// value resolve to the default collection.
    pub fn resolve_value(&self, endpoint: &Value) -> String {
        match endpoint {
            Value::String(s) => self.resolve(s),
            other => {
                tracing::debug!(
                    value = %other,
                    "Non-string endpoint, using default collection"
                );
                self.default_collection.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> EndpointResolver {
        EndpointResolver::new(EndpointMap::from_pairs([
            ("leaves", "leaves"),
            ("performance/overview", "performanceOverview"),
            ("performance", "performance"),
        ]))
    }

    #[test]
    fn test_exact_beats_substring() {
        let r = resolver();
        let resolution = r.try_resolve("/performance/overview?period=month").unwrap();
        assert_eq!(resolution.collection, "performanceOverview");
        assert_eq!(resolution.matched_by, MatchKind::Exact);
    }

    #[test]
    fn test_substring_match() {
        let r = resolver();
        let resolution = r.try_resolve("/performance/reviews").unwrap();
        assert_eq!(resolution.collection, "performance");
        assert_eq!(resolution.matched_by, MatchKind::Substring);
    }

    #[test]
    fn test_segment_fallback() {
        let r = resolver();
        let resolution = r.try_resolve("/projects/42?x=1").unwrap();
        assert_eq!(resolution.collection, "projects");
        assert_eq!(resolution.matched_by, MatchKind::Segment);
    }

    #[test]
    fn test_errors() {
        let r = resolver();
        assert_eq!(r.try_resolve(""), Err(ResolveError::EmptyEndpoint));
        assert_eq!(r.try_resolve("   ").unwrap().collection, "   ");
        assert_eq!(r.try_resolve("   ").unwrap().matched_by, MatchKind::Segment);
        assert!(matches!(
            r.try_resolve("?status=pending"),
            Err(ResolveError::EmptySegment { .. })
        ));
        assert!(matches!(
            r.try_resolve("//x"),
            Err(ResolveError::EmptySegment { .. })
        ));
    }

    #[test]
    fn test_resolve_value_non_strings() {
        let r = resolver();
        assert_eq!(r.resolve_value(&Value::Null), "users");
        assert_eq!(r.resolve_value(&json!(42)), "users");
        assert_eq!(r.resolve_value(&json!({"path": "/leaves"})), "users");
        assert_eq!(r.resolve_value(&json!("/leaves")), "leaves");
    }

    #[test]
    fn test_custom_default() {
        let r = resolver().with_default_collection("misc");
        assert_eq!(r.resolve(""), "misc");
    }
}
