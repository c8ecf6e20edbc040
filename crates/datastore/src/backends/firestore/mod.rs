//! Cloud Firestore backend over the REST API.
//!
//! Talks to the v1 REST surface (`runQuery`, document `GET`/`POST`/`PATCH`/
//! `DELETE`). Errors are classified from the `{"error": {code, message,
//! status}}` body, so security-rule denials surface as
//! [`StoreError::PermissionDenied`] and can be downgraded by the service.
//!
//! Subscriptions poll the query at
//! [`FirestoreConfig::poll_interval`] and emit a snapshot whenever the result
//! changes.

mod config;
mod query;
mod value;

pub use config::{FirestoreAuth, FirestoreConfig};
pub use query::{field_path, quote_segment, structured_query};
pub use value::{decode_document, decode_fields, decode_value, encode_fields, encode_value};

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde_json::{Map, Value, json};

use crate::core::{DocumentStore, Subscription};
use crate::error::{StoreError, StoreResult};
use crate::types::{CollectionQuery, Document};

const BACKEND_NAME: &str = "firestore";

/// Firestore [`DocumentStore`].
#[derive(Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    config: Arc<FirestoreConfig>,
}

impl Debug for FirestoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreStore")
            .field("project_id", &self.config.project_id)
            .field("database_id", &self.config.database_id)
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl FirestoreStore {
    /// Creates a store from a validated configuration.
    pub fn new(config: FirestoreConfig) -> StoreResult<Self> {
        config
            .validate()
            .map_err(|errors| StoreError::InvalidArgument {
                message: errors.join("; "),
            })?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}/{}", self.base(), self.config.documents_root(), collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    fn run_query_url(&self) -> String {
        format!("{}/{}:runQuery", self.base(), self.config.documents_root())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        tracing::trace!(method = %method, url = %url, "Firestore request");
        let builder = self.client.request(method, url);
        match &self.config.auth {
            FirestoreAuth::None => builder,
            FirestoreAuth::BearerToken { token } => builder.bearer_auth(token),
            FirestoreAuth::ApiKey { key } => builder.query(&[("key", key)]),
        }
    }

    async fn execute(&self, collection: &str, request: RequestBuilder) -> StoreResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = classify_error(collection, status.as_u16(), &body);
            tracing::debug!(
                collection = %collection,
                status = status.as_u16(),
                "Firestore request failed: {}",
                error
            );
            return Err(error);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn run_query(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> StoreResult<Vec<Document>> {
        let request = self
            .request(Method::POST, &self.run_query_url())
            .json(&structured_query(collection, query));
        let response = self.execute(collection, request).await?;
        decode_run_query(&response)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn query(
        &self,
        collection: &str,
        query: &CollectionQuery,
    ) -> StoreResult<Vec<Document>> {
        self.run_query(collection, query).await
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let request = self.request(Method::GET, &self.document_url(collection, id));
        match self.execute(collection, request).await {
            Ok(resource) => Ok(Some(decode_document(&resource)?)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        let request = self
            .request(Method::POST, &self.collection_url(collection))
            .json(&json!({ "fields": encode_fields(&fields) }));
        let resource = self.execute(collection, request).await?;
        let document = decode_document(&resource)?;
        tracing::debug!(collection = %collection, id = %document.id(), "Added document");
        Ok(document.id().to_string())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        // A PATCH without a mask replaces the whole document.
        if fields.is_empty() {
            return match self.get(collection, id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }),
            };
        }

        let request = self
            .request(Method::PATCH, &self.document_url(collection, id))
            .query(&update_params(&fields))
            .json(&json!({ "fields": encode_fields(&fields) }));

        match self.execute(collection, request).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound { .. }) => Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let request = self.request(Method::DELETE, &self.document_url(collection, id));
        self.execute(collection, request).await?;
        Ok(())
    }

    async fn subscribe(
        &self,
        collection: &str,
        query: CollectionQuery,
    ) -> StoreResult<Subscription> {
        let (sender, subscription) = Subscription::channel(collection);
        let store = self.clone();
        let collection = collection.to_string();
        let interval = self.config.poll_interval;

        tokio::spawn(async move {
            let mut last: Option<Vec<Document>> = None;
            loop {
                let snapshot = store.run_query(&collection, &query).await;
                let changed = match (&snapshot, &last) {
                    (Ok(current), Some(previous)) => current != previous,
                    _ => true,
                };
                if changed {
                    last = snapshot.as_ref().ok().cloned();
                    if !sender.send(snapshot).await {
                        break;
                    }
                }
                tokio::select! {
                    _ = sender.closed() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            tracing::debug!(collection = %collection, "Subscription closed");
        });

        Ok(subscription)
    }
}

/// Query parameters for a merge PATCH: one mask entry per field, and the
/// precondition that the document exists.
fn update_params(fields: &Map<String, Value>) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = fields
        .keys()
        .map(|name| ("updateMask.fieldPaths", quote_segment(name)))
        .collect();
    params.push(("currentDocument.exists", "true".to_string()));
    params
}

/// Decodes a `runQuery` response stream (an array of `{document?, readTime}`).
fn decode_run_query(response: &Value) -> StoreResult<Vec<Document>> {
    let Some(entries) = response.as_array() else {
        return Err(StoreError::Serialization {
            message: format!("unexpected runQuery response: {}", response),
        });
    };
    entries
        .iter()
        .filter_map(|entry| entry.get("document"))
        .map(decode_document)
        .collect()
}

/// Classifies a non-success response from its status and error body.
fn classify_error(collection: &str, http_status: u16, body: &str) -> StoreError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    // runQuery reports errors as a one-element stream.
    let error = parsed.as_ref().and_then(|value| match value {
        Value::Array(items) => items.first().and_then(|item| item.get("error")),
        other => other.get("error"),
    });

    let status = error
        .and_then(|e| e.get("status"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| http_status.to_string());
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}: {}", http_status, body.trim()));

    tracing::debug!(collection = %collection, status = %status, "Firestore error: {}", message);
    StoreError::from_status(BACKEND_NAME, collection, &status, message)
}
