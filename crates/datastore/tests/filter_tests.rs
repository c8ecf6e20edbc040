//! Filter normalization integration tests.

use serde_json::{Value, json};

use staffhub_datastore::filter::{FilterOperator, Predicate, normalize_filters};
use staffhub_datastore::types::{FetchOptions, OrderBy, SortDirection};

/// Renders predicates back into a filter object.
fn as_filter_object(predicates: &[Predicate]) -> Value {
    Value::Object(
        predicates
            .iter()
            .map(|p| (p.field().to_string(), p.value()))
            .collect(),
    )
}

#[test]
fn test_mixed_filter_object() {
    let predicates = normalize_filters(&json!({
        "status": "",
        "name": "  Jane  ",
        "age": 0,
        "tags": [],
        "roles": ["admin", "manager"]
    }));

    assert_eq!(
        predicates,
        vec![
            Predicate::string_eq("name", "Jane"),
            Predicate::numeric_eq("age", 0),
            Predicate::in_set("roles", vec![json!("admin"), json!("manager")]),
        ]
    );
}

#[test]
fn test_non_object_filters_yield_nothing() {
    assert!(normalize_filters(&json!(null)).is_empty());
    assert!(normalize_filters(&json!("status=pending")).is_empty());
    assert!(normalize_filters(&json!(["status"])).is_empty());
    assert!(normalize_filters(&json!({})).is_empty());
}

#[test]
fn test_false_and_zero_are_kept() {
    let predicates = normalize_filters(&json!({"active": false, "days": 0}));
    assert_eq!(predicates.len(), 2);
    assert_eq!(predicates[0], Predicate::boolean_eq("active", false));
    assert_eq!(predicates[1].value(), json!(0));
}

#[test]
fn test_blank_and_structured_values_are_dropped() {
    let predicates = normalize_filters(&json!({
        "department": "   ",
        "manager": null,
        "address": {"city": "Oslo"},
        "tags": []
    }));
    assert!(predicates.is_empty());
}

#[test]
fn test_key_order_is_preserved() {
    let predicates = normalize_filters(&json!({"z": 1, "a": 2, "m": 3}));
    let fields: Vec<&str> = predicates.iter().map(Predicate::field).collect();
    assert_eq!(fields, vec!["z", "a", "m"]);
}

#[test]
fn test_normalization_is_idempotent() {
    let input = json!({
        "status": " pending ",
        "blank": "",
        "days": 2.5,
        "remote": true,
        "roles": ["admin"]
    });
    let once = normalize_filters(&input);
    let twice = normalize_filters(&as_filter_object(&once));
    assert_eq!(once, twice);
}

#[test]
fn test_predicates_serialize_as_triples() {
    let predicates = normalize_filters(&json!({"status": "pending", "roles": ["a", "b"]}));
    assert_eq!(
        serde_json::to_value(&predicates).unwrap(),
        json!([
            {"field": "status", "operator": "==", "value": "pending"},
            {"field": "roles", "operator": "in", "value": ["a", "b"]}
        ])
    );
    assert_eq!(predicates[1].operator(), FilterOperator::In);
}

#[test]
fn test_fetch_options_from_hook_json() {
    let options: FetchOptions = serde_json::from_value(json!({
        "filters": {"status": "pending", "type": ""},
        "orderBy": {"field": "startDate", "direction": "desc"},
        "limit": 10
    }))
    .unwrap();

    let query = options.to_query();
    assert_eq!(query.predicates, vec![Predicate::string_eq("status", "pending")]);
    assert_eq!(query.order_by, Some(OrderBy::desc("startDate")));
    assert_eq!(query.limit, Some(10));
}

#[test]
fn test_order_by_parse() {
    assert_eq!(OrderBy::parse("name"), Some(OrderBy::asc("name")));
    assert_eq!(OrderBy::parse("startDate:desc"), Some(OrderBy::desc("startDate")));
    assert_eq!(OrderBy::parse("-days"), Some(OrderBy::desc("days")));
    assert_eq!(OrderBy::parse(""), None);
    assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
}
