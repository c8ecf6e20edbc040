//! Sample data for empty collections.
//!
//! Outside production, a freshly provisioned database has no documents and
//! every list in the UI renders empty. [`SeedingStore`] wraps a
//! [`DocumentStore`] and, the first time a collection is read, fills it from
//! a [`SeedDataProvider`] if it is empty.
//!
//! # Example
//!
//! ```
//! use staffhub_datastore::backends::memory::MemoryStore;
//! use staffhub_datastore::core::DocumentStore;
//! use staffhub_datastore::seed::{SeedingStore, StaticSeedData};
//! use staffhub_datastore::types::CollectionQuery;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let samples = StaticSeedData::new()
//!     .with_collection("holidays", vec![json!({"name": "New Year", "date": "2025-01-01"})]);
//! let store = SeedingStore::new(MemoryStore::new(), samples);
//!
//! let docs = store.query("holidays", &CollectionQuery::all()).await.unwrap();
//! assert_eq!(docs.len(), 1);
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{DocumentStore, Subscription};
use crate::error::{StoreError, StoreResult};
use crate::types::{CollectionQuery, Document};

/// Source of sample documents, looked up by collection name.
pub trait SeedDataProvider: Send + Sync {
    /// Returns sample documents for `collection`, if any are known.
    fn sample_documents(&self, collection: &str) -> Option<Vec<Map<String, Value>>>;
}

/// Seed data held in memory, optionally loaded from a JSON file.
///
/// The file format is an object mapping collection names to arrays of
/// documents: `{"holidays": [{"name": "New Year"}], "roles": [...]}`.
/// Array entries that are not objects are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticSeedData {
    collections: HashMap<String, Vec<Value>>,
}

impl StaticSeedData {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds sample documents for a collection.
    pub fn with_collection(mut self, collection: impl Into<String>, documents: Vec<Value>) -> Self {
        self.collections.insert(collection.into(), documents);
        self
    }

    /// Loads sample data from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| StoreError::InvalidArgument {
            message: format!("cannot read seed file {}: {}", path.as_ref().display(), e),
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Returns the collections this provider knows about.
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

impl SeedDataProvider for StaticSeedData {
    fn sample_documents(&self, collection: &str) -> Option<Vec<Map<String, Value>>> {
        let documents: Vec<Map<String, Value>> = self
            .collections
            .get(collection)?
            .iter()
            .filter_map(|doc| doc.as_object().cloned())
            .collect();
        (!documents.is_empty()).then_some(documents)
    }
}

/// [`DocumentStore`] wrapper that seeds empty collections on first read.
///
/// Each collection is considered at most once per wrapper. Seeding errors
/// are logged and never fail the read that triggered them.
pub struct SeedingStore<S, P> {
    inner: S,
    provider: P,
    enabled: bool,
    considered: Mutex<HashSet<String>>,
}

impl<S, P> std::fmt::Debug for SeedingStore<S, P>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedingStore")
            .field("inner", &self.inner)
            .field("enabled", &self.enabled)
            .field("considered", &self.considered.lock().len())
            .finish_non_exhaustive()
    }
}

impl<S, P> SeedingStore<S, P>
where
    S: DocumentStore,
    P: SeedDataProvider,
{
    /// Wraps `inner`, seeding from `provider`.
    pub fn new(inner: S, provider: P) -> Self {
        Self {
            inner,
            provider,
            enabled: true,
            considered: Mutex::new(HashSet::new()),
        }
    }

    /// Enables or disables seeding.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Seeds `collection` if it is empty and has not been considered yet.
    ///
    /// A failed attempt leaves the collection unconsidered, so the next read
    /// tries again. Returns the number of documents inserted.
    pub async fn seed_if_empty(&self, collection: &str) -> StoreResult<usize> {
        if !self.enabled || !self.considered.lock().insert(collection.to_string()) {
            return Ok(0);
        }

        let Some(samples) = self.provider.sample_documents(collection) else {
            return Ok(0);
        };

        match self.insert_samples(collection, samples).await {
            Ok(inserted) => Ok(inserted),
            Err(e) => {
                self.considered.lock().remove(collection);
                Err(e)
            }
        }
    }

    async fn insert_samples(
        &self,
        collection: &str,
        samples: Vec<Map<String, Value>>,
    ) -> StoreResult<usize> {
        if !self.inner.is_empty(collection).await? {
            return Ok(0);
        }

        let mut inserted = 0;
        for sample in samples {
            self.inner.add(collection, sample).await?;
            inserted += 1;
        }

        tracing::info!(
            collection = %collection,
            count = inserted,
            "Seeded empty collection with sample data"
        );
        Ok(inserted)
    }
}

#[async_trait]
impl<S, P> DocumentStore for SeedingStore<S, P>
where
    S: DocumentStore,
    P: SeedDataProvider,
{
    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }

    async fn query(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> StoreResult<Vec<Document>> {
        if let Err(e) = self.seed_if_empty(collection).await {
            tracing::warn!(collection = %collection, "Seeding failed: {}", e);
        }
        self.inner.query(collection, query).await
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        self.inner.add(collection, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.inner.delete(collection, id).await
    }

    async fn subscribe(
        &self,
        collection: &str,
        query: CollectionQuery,
    ) -> StoreResult<Subscription> {
        if let Err(e) = self.seed_if_empty(collection).await {
            tracing::warn!(collection = %collection, "Seeding failed: {}", e);
        }
        self.inner.subscribe(collection, query).await
    }

    async fn is_empty(&self, collection: &str) -> StoreResult<bool> {
        self.inner.is_empty(collection).await
    }
}
