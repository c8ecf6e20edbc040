//! Endpoint resolution integration tests.

use serde_json::json;

use staffhub_datastore::endpoint::{
    EndpointMap, EndpointResolver, MatchKind, document_id, first_segment,
};
use staffhub_datastore::error::ResolveError;

fn resolver() -> EndpointResolver {
    EndpointResolver::new(EndpointMap::hr_defaults())
}

// ============================================================================
// Table lookups
// ============================================================================

#[test]
fn test_mapped_endpoints() {
    let resolver = resolver();
    assert_eq!(resolver.resolve("/employees"), "employees");
    assert_eq!(resolver.resolve("/leave-balances"), "leaveBalances");
    assert_eq!(resolver.resolve("/employee-documents/42"), "employeeDocuments");
    assert_eq!(resolver.resolve("/dashboard"), "dashboardStats");
}

#[test]
fn test_query_string_is_ignored() {
    assert_eq!(resolver().resolve("/leaves?status=pending"), "leaves");
    assert_eq!(resolver().resolve("leaves?status=pending&page=2"), "leaves");
}

#[test]
fn test_substring_match_uses_declaration_order() {
    let map = EndpointMap::builder()
        .map("leave", "leaveRequests")
        .map("leave-types", "leaveTypes")
        .build();
    let resolver = EndpointResolver::new(map);

    let resolution = resolver.try_resolve("/hr/leave-types/annual").unwrap();
    assert_eq!(resolution.collection, "leaveRequests");
    assert_eq!(resolution.matched_by, MatchKind::Substring);
}

#[test]
fn test_exact_match_wins_over_substring() {
    let map = EndpointMap::builder()
        .map("leave", "leaveRequests")
        .map("leave-types", "leaveTypes")
        .build();
    let resolution = EndpointResolver::new(map).try_resolve("/leave-types").unwrap();
    assert_eq!(resolution.collection, "leaveTypes");
    assert_eq!(resolution.matched_by, MatchKind::Exact);
}

// ============================================================================
// Fallbacks
// ============================================================================

#[test]
fn test_unmapped_endpoint_uses_first_segment() {
    let resolver = EndpointResolver::new(EndpointMap::builder().build());
    for endpoint in ["/projects", "/projects/7", "projects/7/tasks", "/projects?x=1"] {
        let resolution = resolver.try_resolve(endpoint).unwrap();
        assert_eq!(resolution.collection, "projects", "endpoint {}", endpoint);
        assert_eq!(resolution.matched_by, MatchKind::Segment);
    }
}

#[test]
fn test_empty_first_segment_falls_back_to_users() {
    let resolver = EndpointResolver::new(EndpointMap::builder().build());
    assert_eq!(resolver.resolve("/"), "users");
    assert_eq!(resolver.resolve("//leaves"), "users");
    assert!(matches!(
        resolver.try_resolve("/"),
        Err(ResolveError::EmptySegment { .. })
    ));
}

#[test]
fn test_non_string_and_blank_endpoints_resolve_to_users() {
    let resolver = resolver();
    assert_eq!(resolver.resolve_value(&json!(null)), "users");
    assert_eq!(resolver.resolve_value(&json!(42)), "users");
    assert_eq!(resolver.resolve_value(&json!({"path": "/leaves"})), "users");
    assert_eq!(resolver.resolve_value(&json!("")), "users");
    assert_eq!(resolver.try_resolve(""), Err(ResolveError::EmptyEndpoint));
}

#[test]
fn test_whitespace_endpoints_resolve_to_first_segment() {
    let resolver = EndpointResolver::new(EndpointMap::builder().build());
    assert_eq!(resolver.resolve("   "), "   ");
    assert_eq!(resolver.resolve(" /x"), " ");
    assert_eq!(resolver.resolve("   ?status=pending"), "   ");
}

#[test]
fn test_custom_default_collection() {
    let resolver = resolver().with_default_collection("people");
    assert_eq!(resolver.resolve(""), "people");
    assert_eq!(resolver.default_collection(), "people");
}

#[test]
fn test_resolution_is_deterministic() {
    let resolver = resolver();
    for endpoint in ["/leaves/abc", "/reports/q1", "", "/surveys/1/responses"] {
        assert_eq!(resolver.resolve(endpoint), resolver.resolve(endpoint));
    }
}

// ============================================================================
// Path helpers and map loading
// ============================================================================

#[test]
fn test_document_id_rules() {
    assert_eq!(document_id("/leaves/abc123"), Some("abc123"));
    assert_eq!(document_id("/leaves/abc123?x=1"), Some("abc123"));
    assert_eq!(document_id("/employees/emp-1/documents/d-9"), Some("d-9"));
    assert_eq!(document_id("/leaves"), None);
    assert_eq!(document_id("/leaves/"), None);
    assert_eq!(document_id(""), None);
    assert_eq!(first_segment("leaves/abc"), "leaves");
}

#[test]
fn test_endpoint_map_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("endpoints.json");
    std::fs::write(
        &path,
        r#"[{"prefix": "staff", "collection": "employees"}, {"prefix": "", "collection": "ignored"}]"#,
    )
    .unwrap();

    let map = EndpointMap::from_json_file(&path).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(EndpointResolver::new(map).resolve("/staff/3"), "employees");
}
