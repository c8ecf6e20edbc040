//! In-memory document store.
//!
//! Used for development, demos and tests. Collections live in process memory
//! and are lost on drop. Access to individual collections can be denied to
//! reproduce the permission errors a hosted database returns under its
//! security rules.

mod eval;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::core::{DocumentStore, Subscription};
use crate::error::{StoreError, StoreResult};
use crate::types::{CollectionQuery, Document};

const BACKEND_NAME: &str = "memory";

/// Capacity of the change notification channel.
const CHANGE_BUFFER: usize = 256;

/// Message returned for denied collections.
pub const PERMISSION_DENIED_MESSAGE: &str = "Missing or insufficient permissions.";

type Collection = BTreeMap<String, Map<String, Value>>;

struct MemoryInner {
    collections: RwLock<HashMap<String, Collection>>,
    denied: RwLock<HashSet<String>>,
    changes: broadcast::Sender<String>,
}

/// In-memory [`DocumentStore`].
///
/// Cloning is cheap and clones share the same data. Documents are kept in id
/// order, which is also the order of unordered query results.
///
/// # Examples
///
/// ```
/// use staffhub_datastore::backends::memory::MemoryStore;
/// use staffhub_datastore::core::DocumentStore;
/// use staffhub_datastore::types::CollectionQuery;
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = MemoryStore::new();
/// store.insert("leaves", "l-1", json!({"status": "pending"}));
///
/// let docs = store.query("leaves", &CollectionQuery::all()).await.unwrap();
/// assert_eq!(docs.len(), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("collections", &self.inner.collections.read().len())
            .field("denied", &*self.inner.denied.read())
            .finish_non_exhaustive()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            inner: Arc::new(MemoryInner {
                collections: RwLock::new(HashMap::new()),
                denied: RwLock::new(HashSet::new()),
                changes,
            }),
        }
    }

    /// Inserts or replaces a document with a caller-chosen id.
    ///
    /// Non-object values are stored as empty documents.
    pub fn insert(&self, collection: &str, id: &str, value: Value) {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.inner
            .collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        self.notify(collection);
    }

    /// Makes every operation on `collection` fail with a permission error.
    pub fn deny_collection(&self, collection: &str) {
        self.inner.denied.write().insert(collection.to_string());
    }

    /// Lifts a previous [`deny_collection`](Self::deny_collection).
    pub fn allow_collection(&self, collection: &str) {
        self.inner.denied.write().remove(collection);
    }

    /// Returns the number of documents in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .collections
            .read()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Returns the names of all non-empty collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .collections
            .read()
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Removes every document from every collection.
    pub fn clear(&self) {
        let names: Vec<String> = self.inner.collections.write().drain().map(|(k, _)| k).collect();
        for name in names {
            self.notify(&name);
        }
    }

    fn check_access(&self, collection: &str) -> StoreResult<()> {
        if self.inner.denied.read().contains(collection) {
            return Err(StoreError::PermissionDenied {
                collection: collection.to_string(),
                message: PERMISSION_DENIED_MESSAGE.to_string(),
            });
        }
        Ok(())
    }

    fn run_query(&self, collection: &str, query: &CollectionQuery) -> StoreResult<Vec<Document>> {
        self.check_access(collection)?;
        let collections = self.inner.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| eval::apply_query(docs, query))
            .unwrap_or_default())
    }

    fn notify(&self, collection: &str) {
        // No receivers simply means nobody is subscribed.
        let _ = self.inner.changes.send(collection.to_string());
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn query(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> StoreResult<Vec<Document>> {
        self.run_query(collection, query)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.check_access(collection)?;
        Ok(self
            .inner
            .collections
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        self.check_access(collection)?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.inner
            .collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        tracing::debug!(collection = %collection, id = %id, "Added document");
        self.notify(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        self.check_access(collection)?;
        {
            let mut collections = self.inner.collections.write();
            let existing = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            existing.extend(fields);
        }
        self.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check_access(collection)?;
        let removed = self
            .inner
            .collections
            .write()
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if removed {
            self.notify(collection);
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: &str,
        query: CollectionQuery,
    ) -> StoreResult<Subscription> {
        self.check_access(collection)?;

        let (sender, subscription) = Subscription::channel(collection);
        let mut changes = self.inner.changes.subscribe();
        let store = self.clone();
        let collection = collection.to_string();

        tokio::spawn(async move {
            if !sender.send(store.run_query(&collection, &query)).await {
                return;
            }
            loop {
                tokio::select! {
                    _ = sender.closed() => break,
                    change = changes.recv() => match change {
                        Ok(changed) if changed != collection => continue,
                        Ok(_) | Err(RecvError::Lagged(_)) => {}
                        Err(RecvError::Closed) => break,
                    },
                }
                if !sender.send(store.run_query(&collection, &query)).await {
                    break;
                }
            }
            tracing::debug!(collection = %collection, "Subscription closed");
        });

        Ok(subscription)
    }
}
