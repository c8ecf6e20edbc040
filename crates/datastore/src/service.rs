//! The CRUD façade used by UI data hooks.
//!
//! [`DataService`] accepts REST-style endpoints, resolves them to
//! collections, normalizes filters and talks to a [`DocumentStore`]. Each
//! operation comes in two flavours:
//!
//! - `try_*` methods return [`AdapterResult`]`<`[`Fetched`]`<T>>`, so callers
//!   can tell a degraded empty read from real data and from adapter misuse;
//! - envelope methods (`fetch_data`, `create`, ...) project those results onto
//!   the `{success, data, error, message, source}` [`Envelope`] and never
//!   return an error.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use staffhub_datastore::backends::memory::MemoryStore;
//! use staffhub_datastore::config::AdapterConfig;
//! use staffhub_datastore::endpoint::EndpointResolver;
//! use staffhub_datastore::service::DataService;
//! use staffhub_datastore::types::FetchOptions;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let service = DataService::new(
//!     MemoryStore::new(),
//!     Arc::new(EndpointResolver::default()),
//!     AdapterConfig::for_testing(),
//! );
//!
//! let created = service.create("/leaves", json!({"status": "pending"})).await;
//! assert!(created.success);
//!
//! let options = FetchOptions::new().with_filters(json!({"status": "pending"}));
//! let fetched = service.fetch_data("/leaves?status=pending", &options).await;
//! assert_eq!(fetched.data.unwrap().len(), 1);
//!
//! let missing_id = service.delete("/leaves").await;
//! assert_eq!(missing_id.error.as_deref(), Some("Document ID not found in endpoint"));
//! # }
//! ```

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::config::AdapterConfig;
use crate::core::{DocumentStore, Subscription};
use crate::endpoint::{EndpointMap, EndpointResolver, document_id};
use crate::error::{AdapterError, AdapterResult, StoreError};
use crate::types::{Document, Envelope, FetchOptions, Fetched};

/// Field stamped with the creation time.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Field stamped with the last modification time.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Endpoint-addressed access to a document store.
#[derive(Debug, Clone)]
pub struct DataService<S> {
    store: S,
    resolver: Arc<EndpointResolver>,
    config: AdapterConfig,
}

impl<S> DataService<S>
where
    S: DocumentStore,
{
    /// Creates a service over `store` using a shared resolver.
    ///
    /// Unresolvable endpoints fall back to the resolver's own default
    /// collection; `config.default_collection` is not consulted.
    pub fn new(store: S, resolver: Arc<EndpointResolver>, config: AdapterConfig) -> Self {
        Self {
            store,
            resolver,
            config,
        }
    }

    /// Creates a service whose resolver falls back to the configured
    /// default collection.
    pub fn with_endpoint_map(store: S, map: EndpointMap, config: AdapterConfig) -> Self {
        let resolver =
            EndpointResolver::new(map).with_default_collection(config.default_collection.clone());
        Self::new(store, Arc::new(resolver), config)
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the endpoint resolver.
    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Resolves the collection an endpoint addresses.
    pub fn collection_for(&self, endpoint: &str) -> String {
        self.resolver.resolve(endpoint)
    }

    // ------------------------------------------------------------------
    // Typed operations
    // ------------------------------------------------------------------

    /// Reads the documents of the collection addressed by `endpoint`.
    pub async fn try_fetch(
        &self,
        endpoint: &str,
        options: &FetchOptions,
    ) -> AdapterResult<Fetched<Vec<Document>>> {
        let collection = self.resolver.resolve(endpoint);
        let query = options.to_query();

        tracing::debug!(
            endpoint = %endpoint,
            collection = %collection,
            predicates = query.predicates.len(),
            limit = ?query.limit,
            "Fetching collection"
        );

        match self.store.query(&collection, &query).await {
            Ok(documents) => Ok(Fetched::Data(documents)),
            Err(e) => self.degrade(&collection, e, Vec::new()),
        }
    }

    /// Reads the single document addressed by `endpoint`.
    ///
    /// A missing document is `Fetched::Data(None)`.
    pub async fn try_fetch_by_id(&self, endpoint: &str) -> AdapterResult<Fetched<Option<Document>>> {
        let (collection, id) = self.target(endpoint)?;

        tracing::debug!(endpoint = %endpoint, collection = %collection, id = %id, "Fetching document");

        match self.store.get(&collection, id).await {
            Ok(document) => Ok(Fetched::Data(document)),
            Err(e) => self.degrade(&collection, e, None),
        }
    }

    /// Adds `data` to the collection addressed by `endpoint`.
    pub async fn try_create(&self, endpoint: &str, data: Value) -> AdapterResult<Document> {
        let collection = self.resolver.resolve(endpoint);
        let mut fields = into_fields(data)?;
        if self.config.stamp_timestamps {
            let now = timestamp();
            stamp(&mut fields, CREATED_AT_FIELD, &now);
            stamp(&mut fields, UPDATED_AT_FIELD, &now);
        }

        tracing::debug!(endpoint = %endpoint, collection = %collection, "Creating document");

        let id = self.store.add(&collection, fields.clone()).await?;
        Ok(Document::new(id, fields))
    }

    /// Merges `data` into the document addressed by `endpoint`.
    ///
    /// The returned document carries the id and the merged fields only.
    pub async fn try_update(&self, endpoint: &str, data: Value) -> AdapterResult<Document> {
        let (collection, id) = self.target(endpoint)?;
        let mut fields = into_fields(data)?;
        if self.config.stamp_timestamps {
            stamp(&mut fields, UPDATED_AT_FIELD, &timestamp());
        }

        tracing::debug!(endpoint = %endpoint, collection = %collection, id = %id, "Updating document");

        self.store.update(&collection, id, fields.clone()).await?;
        Ok(Document::new(id, fields))
    }

    /// Deletes the document addressed by `endpoint` and returns its id.
    pub async fn try_delete(&self, endpoint: &str) -> AdapterResult<String> {
        let (collection, id) = self.target(endpoint)?;

        tracing::debug!(endpoint = %endpoint, collection = %collection, id = %id, "Deleting document");

        self.store.delete(&collection, id).await?;
        Ok(id.to_string())
    }

    /// Subscribes to the collection addressed by `endpoint`.
    ///
    /// The collection and predicates are derived exactly as for
    /// [`fetch_data`](Self::fetch_data).
    pub async fn subscribe(
        &self,
        endpoint: &str,
        options: &FetchOptions,
    ) -> AdapterResult<Subscription> {
        let collection = self.resolver.resolve(endpoint);
        let query = options.to_query();

        tracing::debug!(
            endpoint = %endpoint,
            collection = %collection,
            predicates = query.predicates.len(),
            "Subscribing to collection"
        );

        Ok(self.store.subscribe(&collection, query).await?)
    }

    // ------------------------------------------------------------------
    // Envelope operations
    // ------------------------------------------------------------------

    /// Reads a collection and wraps the outcome in an envelope.
    pub async fn fetch_data(&self, endpoint: &str, options: &FetchOptions) -> Envelope<Vec<Document>> {
        let collection = self.resolver.resolve(endpoint);
        match self.try_fetch(endpoint, options).await {
            Ok(Fetched::Data(documents)) => {
                let message = format!("Fetched {} documents from {}", documents.len(), collection);
                Envelope::ok(documents, &self.config.source).with_message(message)
            }
            Ok(Fetched::Degraded { data, reason }) => Envelope::ok(data, &self.config.source)
                .with_message(degraded_message(&collection, &reason)),
            Err(e) => self.read_failure(endpoint, e),
        }
    }

    /// Reads one document and wraps the outcome in an envelope.
    ///
    /// A missing document is a success with no data.
    pub async fn fetch_by_id(&self, endpoint: &str) -> Envelope<Option<Document>> {
        let collection = self.resolver.resolve(endpoint);
        match self.try_fetch_by_id(endpoint).await {
            Ok(Fetched::Data(Some(document))) => {
                let message = format!("Fetched document {} from {}", document.id(), collection);
                Envelope::ok(Some(document), &self.config.source).with_message(message)
            }
            Ok(Fetched::Data(None)) => Envelope::ok(None, &self.config.source)
                .with_message(format!("No such document in {}", collection)),
            Ok(Fetched::Degraded { data, reason }) => Envelope::ok(data, &self.config.source)
                .with_message(degraded_message(&collection, &reason)),
            Err(e) => self.read_failure(endpoint, e),
        }
    }

    /// Creates a document and wraps the outcome in an envelope.
    pub async fn create(&self, endpoint: &str, data: Value) -> Envelope<Document> {
        match self.try_create(endpoint, data).await {
            Ok(document) => {
                let message = format!("Created document {}", document.id());
                Envelope::ok(document, &self.config.source).with_message(message)
            }
            Err(e) => self.write_failure("create", endpoint, e),
        }
    }

    /// Updates a document and wraps the outcome in an envelope.
    pub async fn update(&self, endpoint: &str, data: Value) -> Envelope<Document> {
        match self.try_update(endpoint, data).await {
            Ok(document) => {
                let message = format!("Updated document {}", document.id());
                Envelope::ok(document, &self.config.source).with_message(message)
            }
            Err(e) => self.write_failure("update", endpoint, e),
        }
    }

    /// Deletes a document and wraps the outcome in an envelope.
    pub async fn delete(&self, endpoint: &str) -> Envelope<String> {
        match self.try_delete(endpoint).await {
            Ok(id) => {
                let message = format!("Deleted document {}", id);
                Envelope::ok(id, &self.config.source).with_message(message)
            }
            Err(e) => self.write_failure("delete", endpoint, e),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    /// Resolves the collection and document id of an id-addressed endpoint.
    fn target<'e>(&self, endpoint: &'e str) -> AdapterResult<(String, &'e str)> {
        let id = document_id(endpoint).ok_or_else(|| AdapterError::MissingDocumentId {
            endpoint: endpoint.to_string(),
        })?;
        Ok((self.resolver.resolve(endpoint), id))
    }

    fn degrade<T>(
        &self,
        collection: &str,
        error: StoreError,
        placeholder: T,
    ) -> AdapterResult<Fetched<T>> {
        if self.config.degrade_read_errors && error.is_degradable() {
            tracing::warn!(
                collection = %collection,
                backend = self.store.backend_name(),
                "Read downgraded to empty result: {}",
                error
            );
            Ok(Fetched::Degraded {
                data: placeholder,
                reason: error,
            })
        } else {
            Err(error.into())
        }
    }

    fn read_failure<T>(&self, endpoint: &str, error: AdapterError) -> Envelope<T> {
        tracing::warn!(endpoint = %endpoint, "Read failed: {}", error);
        Envelope::failure(error.to_string(), &self.config.source)
    }

    fn write_failure<T>(&self, operation: &str, endpoint: &str, error: AdapterError) -> Envelope<T> {
        tracing::error!(
            operation = operation,
            endpoint = %endpoint,
            backend = self.store.backend_name(),
            "Write failed: {}",
            error
        );
        Envelope::failure(error.to_string(), &self.config.source)
    }
}

fn degraded_message(collection: &str, reason: &StoreError) -> String {
    format!(
        "Collection '{}' is not accessible ({}); returning empty result",
        collection, reason
    )
}

fn into_fields(data: Value) -> AdapterResult<Map<String, Value>> {
    match data {
        Value::Object(fields) => Ok(fields),
        other => Err(AdapterError::InvalidPayload {
            message: format!("expected a JSON object, got {}", json_type_name(&other)),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Sets `field` to `now` unless the payload already carries it.
fn stamp(fields: &mut Map<String, Value>, field: &str, now: &str) {
    fields
        .entry(field)
        .or_insert_with(|| Value::String(now.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::backends::memory::MemoryStore;

    fn service(config: AdapterConfig) -> DataService<MemoryStore> {
        DataService::with_endpoint_map(MemoryStore::new(), EndpointMap::hr_defaults(), config)
    }

    #[test]
    fn test_default_collection_source_per_constructor() {
        let config = AdapterConfig {
            default_collection: "people".to_string(),
            ..AdapterConfig::for_testing()
        };

        let from_map = service(config.clone());
        assert_eq!(from_map.resolver().resolve(""), "people");

        let shared = Arc::new(EndpointResolver::new(EndpointMap::hr_defaults()));
        let from_resolver = DataService::new(MemoryStore::new(), shared, config);
        assert_eq!(from_resolver.resolver().resolve(""), "users");
    }

    #[test]
    fn test_into_fields_rejects_non_objects() {
        assert!(into_fields(json!({"a": 1})).is_ok());
        let err = into_fields(json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "invalid payload: expected a JSON object, got an array");
    }

    #[test]
    fn test_stamp_keeps_existing_value() {
        let mut fields = Map::new();
        fields.insert(CREATED_AT_FIELD.to_string(), json!("2024-01-01T00:00:00.000Z"));
        stamp(&mut fields, CREATED_AT_FIELD, "now");
        stamp(&mut fields, UPDATED_AT_FIELD, "now");
        assert_eq!(fields[CREATED_AT_FIELD], json!("2024-01-01T00:00:00.000Z"));
        assert_eq!(fields[UPDATED_AT_FIELD], json!("now"));
    }

    #[tokio::test]
    async fn test_create_stamps_timestamps() {
        let service = service(AdapterConfig::default());
        let created = service.try_create("/holidays", json!({"name": "New Year"})).await.unwrap();
        let created_at = created.get(CREATED_AT_FIELD).and_then(Value::as_str).unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
        assert_eq!(created.get(UPDATED_AT_FIELD), created.get(CREATED_AT_FIELD));
    }

    #[tokio::test]
    async fn test_testing_config_does_not_stamp() {
        let service = service(AdapterConfig::for_testing());
        let created = service.try_create("/holidays", json!({"name": "New Year"})).await.unwrap();
        assert_eq!(created.fields().len(), 1);
    }

    #[tokio::test]
    async fn test_default_collection_comes_from_config() {
        let config = AdapterConfig {
            default_collection: "people".to_string(),
            ..AdapterConfig::for_testing()
        };
        let service = service(config);
        assert_eq!(service.collection_for(""), "people");
    }

    #[tokio::test]
    async fn test_degrade_disabled_surfaces_error() {
        let config = AdapterConfig {
            degrade_read_errors: false,
            ..AdapterConfig::for_testing()
        };
        let service = service(config);
        service.store().deny_collection("payroll");

        let envelope = service.fetch_data("/payroll", &FetchOptions::new()).await;
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("permission denied"));
    }
}
