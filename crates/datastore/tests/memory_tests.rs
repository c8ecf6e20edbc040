//! In-memory backend and subscription integration tests.

mod common;

use std::time::Duration;

use serde_json::json;

use common::{seeded_memory_store, service_over};
use staffhub_datastore::backends::memory::MemoryStore;
use staffhub_datastore::core::DocumentStore;
use staffhub_datastore::error::StoreError;
use staffhub_datastore::filter::Predicate;
use staffhub_datastore::types::{CollectionQuery, FetchOptions, OrderBy};

const WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn test_in_set_and_nested_predicates() {
    let store = MemoryStore::new();
    store.insert("employees", "a", json!({"role": "admin", "address": {"city": "Oslo"}}));
    store.insert("employees", "b", json!({"role": "manager", "address": {"city": "Bergen"}}));
    store.insert("employees", "c", json!({"role": "staff", "address": {"city": "Oslo"}}));

    let query = CollectionQuery::all()
        .with_predicate(Predicate::in_set("role", vec![json!("admin"), json!("staff")]))
        .with_predicate(Predicate::string_eq("address.city", "Oslo"))
        .with_order_by(OrderBy::desc("role"));
    let docs = store.query("employees", &query).await.unwrap();

    let ids: Vec<&str> = docs.iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec!["c", "a"]);
}

#[tokio::test]
async fn test_add_assigns_unique_ids() {
    let store = MemoryStore::new();
    let first = store.add("roles", Default::default()).await.unwrap();
    let second = store.add("roles", Default::default()).await.unwrap();
    assert_ne!(first, second);
    assert_eq!(store.len("roles"), 2);
}

#[tokio::test]
async fn test_delete_missing_document_is_ok() {
    let store = seeded_memory_store();
    store.delete("leaves", "does-not-exist").await.unwrap();
    assert_eq!(store.len("leaves"), 3);
}

#[tokio::test]
async fn test_denied_collection_blocks_writes() {
    let store = MemoryStore::new();
    store.deny_collection("payroll");
    let err = store.add("payroll", Default::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::PermissionDenied { .. }));
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn test_subscription_receives_initial_and_changed_snapshots() {
    let service = service_over(seeded_memory_store());
    let options = FetchOptions::new().with_filters(json!({"status": "pending"}));

    let mut subscription = service.subscribe("/leaves", &options).await.unwrap();
    assert_eq!(subscription.collection(), "leaves");

    let initial = tokio::time::timeout(WAIT, subscription.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(initial.len(), 2);

    service
        .create("/leaves", json!({"status": "pending", "days": 9}))
        .await;

    let changed = tokio::time::timeout(WAIT, subscription.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(changed.len(), 3);
}

#[tokio::test]
async fn test_subscription_ignores_other_collections() {
    let store = seeded_memory_store();
    let mut subscription = store
        .subscribe("leaves", CollectionQuery::all())
        .await
        .unwrap();
    subscription.next().await.unwrap().unwrap();

    store.insert("employees", "emp-9", json!({"name": "New Hire"}));
    store.insert("leaves", "l-9", json!({"status": "pending"}));

    let next = tokio::time::timeout(WAIT, subscription.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(next.len(), 4);
    assert!(subscription.try_next().is_none());
}

#[tokio::test]
async fn test_subscribe_denied_collection_fails() {
    let store = MemoryStore::new();
    store.deny_collection("payroll");
    let service = service_over(store);
    assert!(service.subscribe("/payroll", &FetchOptions::new()).await.is_err());
}
