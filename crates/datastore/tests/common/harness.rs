//! A scripted store for exercising failure paths.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use staffhub_datastore::backends::memory::MemoryStore;
use staffhub_datastore::core::DocumentStore;
use staffhub_datastore::error::{StoreError, StoreResult};
use staffhub_datastore::types::{CollectionQuery, Document};

/// Which error a [`ScriptedStore`] raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Security-rule denial.
    PermissionDenied,
    /// Transient outage.
    Unavailable,
    /// Malformed request.
    InvalidArgument,
    /// Anything else.
    Internal,
}

impl Failure {
    fn to_error(self, collection: &str) -> StoreError {
        match self {
            Failure::PermissionDenied => StoreError::PermissionDenied {
                collection: collection.to_string(),
                message: "Missing or insufficient permissions.".to_string(),
            },
            Failure::Unavailable => StoreError::Unavailable {
                backend_name: "scripted".to_string(),
                message: "service unavailable".to_string(),
            },
            Failure::InvalidArgument => StoreError::InvalidArgument {
                message: "bad request".to_string(),
            },
            Failure::Internal => StoreError::internal("scripted", "boom"),
        }
    }
}

/// Memory-backed store that records every call and fails on demand.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    inner: MemoryStore,
    read_failure: Mutex<Option<Failure>>,
    write_failure: Mutex<Option<Failure>>,
    calls: AtomicUsize,
    last_target: Mutex<Option<(String, String)>>,
}

impl ScriptedStore {
    /// Creates a scripted store over `inner`.
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Makes reads (`query`, `get`) fail.
    pub fn fail_reads(&self, failure: Failure) {
        *self.read_failure.lock() = Some(failure);
    }

    /// Makes writes (`add`, `update`, `delete`) fail.
    pub fn fail_writes(&self, failure: Failure) {
        *self.write_failure.lock() = Some(failure);
    }

    /// Number of store calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Collection and id of the last id-addressed call.
    pub fn last_target(&self) -> Option<(String, String)> {
        self.last_target.lock().clone()
    }

    /// The wrapped memory store.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn record(&self, collection: &str, id: Option<&str>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(id) = id {
            *self.last_target.lock() = Some((collection.to_string(), id.to_string()));
        }
    }

    fn check(&self, failure: &Mutex<Option<Failure>>, collection: &str) -> StoreResult<()> {
        match *failure.lock() {
            Some(f) => Err(f.to_error(collection)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    fn backend_name(&self) -> &'static str {
        "scripted"
    }

    async fn query(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> StoreResult<Vec<Document>> {
        self.record(collection, None);
        self.check(&self.read_failure, collection)?;
        self.inner.query(collection, query).await
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.record(collection, Some(id));
        self.check(&self.read_failure, collection)?;
        self.inner.get(collection, id).await
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        self.record(collection, None);
        self.check(&self.write_failure, collection)?;
        self.inner.add(collection, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        self.record(collection, Some(id));
        self.check(&self.write_failure, collection)?;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.record(collection, Some(id));
        self.check(&self.write_failure, collection)?;
        self.inner.delete(collection, id).await
    }
}
