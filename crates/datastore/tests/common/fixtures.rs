//! HR document fixtures.

use std::sync::Arc;

use serde_json::{Value, json};

use staffhub_datastore::backends::memory::MemoryStore;
use staffhub_datastore::{AdapterConfig, DataService, DocumentStore, EndpointMap, EndpointResolver};

/// A leave request document.
pub fn leave(employee: &str, status: &str, days: i64) -> Value {
    json!({
        "employeeId": employee,
        "status": status,
        "days": days,
        "type": "annual",
        "startDate": format!("2025-03-{:02}", days + 1),
    })
}

/// An employee document.
pub fn employee(name: &str, department: &str, active: bool) -> Value {
    json!({
        "name": name,
        "department": department,
        "active": active,
        "role": "staff",
    })
}

/// A memory store holding a few leaves and employees.
pub fn seeded_memory_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert("leaves", "l-1", leave("emp-1", "pending", 2));
    store.insert("leaves", "l-2", leave("emp-2", "approved", 5));
    store.insert("leaves", "l-3", leave("emp-1", "pending", 1));
    store.insert("employees", "emp-1", employee("Jane Doe", "engineering", true));
    store.insert("employees", "emp-2", employee("John Roe", "sales", false));
    store
}

/// A service over `store` with the built-in endpoint table and test config.
pub fn service_over<S: DocumentStore>(store: S) -> DataService<S> {
    DataService::new(
        store,
        Arc::new(EndpointResolver::new(EndpointMap::hr_defaults())),
        AdapterConfig::for_testing(),
    )
}
