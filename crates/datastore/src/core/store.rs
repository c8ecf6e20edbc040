//! Document store trait.
//!
//! This module defines [`DocumentStore`], the seam between the adapter and
//! the hosted document database client.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::types::{CollectionQuery, Document};

use super::subscription::Subscription;

/// Client of a hosted document database.
///
/// Implementations expose collection reads with predicates, single-document
/// reads and writes, and realtime subscriptions. The adapter treats the
/// stored documents as opaque field maps.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use staffhub_datastore::core::DocumentStore;
/// use staffhub_datastore::error::StoreResult;
/// use staffhub_datastore::types::{CollectionQuery, Document};
///
/// struct MyStore;
///
/// #[async_trait]
/// impl DocumentStore for MyStore {
///     fn backend_name(&self) -> &'static str {
///         "my-store"
///     }
///
///     async fn query(
///         &self,
///         collection: &str,
///         query: &CollectionQuery,
///     ) -> StoreResult<Vec<Document>> {
///         todo!()
///     }
///
///     // ... implement the remaining required methods
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Reads the documents of `collection` matching `query`.
    ///
    /// Predicates are combined with AND. When an ordering clause is present,
    /// documents lacking the ordered field are not returned.
    async fn query(&self, collection: &str, query: &CollectionQuery)
    -> StoreResult<Vec<Document>>;

    /// Reads a single document. Returns `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Adds a document with a backend-assigned id and returns the id.
    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String>;

    /// Merges `fields` into an existing document.
    ///
    /// # Errors
    ///
    /// * `StoreError::NotFound` - If the document does not exist
    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>)
    -> StoreResult<()>;

    /// Deletes a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Subscribes to the results of `query` on `collection`.
    ///
    /// The default implementation reports the capability as unsupported.
    async fn subscribe(
        &self,
        collection: &str,
        query: CollectionQuery,
    ) -> StoreResult<Subscription> {
        let _ = (collection, query);
        Err(StoreError::UnsupportedCapability {
            backend_name: self.backend_name().to_string(),
            capability: "subscribe".to_string(),
        })
    }

    /// Returns true if `collection` holds no documents.
    async fn is_empty(&self, collection: &str) -> StoreResult<bool> {
        let first = CollectionQuery::all().with_limit(1);
        Ok(self.query(collection, &first).await?.is_empty())
    }
}

#[async_trait]
impl<T> DocumentStore for Arc<T>
where
    T: DocumentStore + ?Sized,
{
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    async fn query(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> StoreResult<Vec<Document>> {
        (**self).query(collection, query).await
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        (**self).get(collection, id).await
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        (**self).add(collection, fields).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        (**self).update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        (**self).delete(collection, id).await
    }

    async fn subscribe(
        &self,
        collection: &str,
        query: CollectionQuery,
    ) -> StoreResult<Subscription> {
        (**self).subscribe(collection, query).await
    }

    async fn is_empty(&self, collection: &str) -> StoreResult<bool> {
        (**self).is_empty(collection).await
    }
}
