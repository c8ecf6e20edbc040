//! Endpoint string helpers.
//!
//! Endpoints are internal addressing keys shaped like REST paths:
//! `/{resource}`, `/{resource}/{id}` or `/{resource}?{query}`.

/// Strips the `?query` suffix and a single leading `/`.
///
/// ```
/// use staffhub_datastore::endpoint::clean_endpoint;
///
/// assert_eq!(clean_endpoint("/leaves?status=pending"), "leaves");
/// assert_eq!(clean_endpoint("//double"), "/double");
/// ```
pub fn clean_endpoint(endpoint: &str) -> &str {
    let path = endpoint
        .split_once('?')
        .map_or(endpoint, |(path, _query)| path);
    path.strip_prefix('/').unwrap_or(path)
}

/// Returns the first `/`-delimited segment of a cleaned endpoint.
pub fn first_segment(cleaned: &str) -> &str {
    cleaned.split('/').next().unwrap_or_default()
}

/// Extracts the document id from the endpoint's final path segment.
///
/// The endpoint must address a document below a collection, so a single
/// segment (`/leaves`) yields no id.
///
/// ```
/// use staffhub_datastore::endpoint::document_id;
///
/// assert_eq!(document_id("/leaves/abc123"), Some("abc123"));
/// assert_eq!(document_id("/leaves/abc123?expand=true"), Some("abc123"));
/// assert_eq!(document_id("/leaves"), None);
/// assert_eq!(document_id("/leaves/"), None);
/// ```
pub fn document_id(endpoint: &str) -> Option<&str> {
    let mut segments = clean_endpoint(endpoint)
        .split('/')
        .filter(|segment| !segment.trim().is_empty());
    let first = segments.next();
    let last = segments.last();
    first.and(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_endpoint_variants() {
        assert_eq!(clean_endpoint("leaves"), "leaves");
        assert_eq!(clean_endpoint("/leaves"), "leaves");
        assert_eq!(clean_endpoint("/performance/overview?period=month"), "performance/overview");
        assert_eq!(clean_endpoint("?only=query"), "");
        assert_eq!(clean_endpoint(""), "");
    }

    #[test]
    fn test_first_segment() {
        assert_eq!(first_segment("projects/42"), "projects");
        assert_eq!(first_segment("/x"), "");
        assert_eq!(first_segment(""), "");
    }

    #[test]
    fn test_document_id_nested() {
        assert_eq!(document_id("/employees/emp-1/documents/doc-9"), Some("doc-9"));
        assert_eq!(document_id("employees/emp-1"), Some("emp-1"));
        assert_eq!(document_id(""), None);
        assert_eq!(document_id("/"), None);
    }
}
