//! Error types for the data access adapter.
//!
//! The hierarchy separates errors raised by a [`DocumentStore`](crate::core::DocumentStore)
//! backend ([`StoreError`]) from errors raised by the adapter itself while
//! interpreting an endpoint or payload ([`AdapterError`], [`ResolveError`]).

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Message used when an update or delete endpoint carries no document id.
pub const MISSING_DOCUMENT_ID: &str = "Document ID not found in endpoint";

/// The primary error type for adapter operations.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The endpoint has no trailing segment usable as a document id.
    #[error("Document ID not found in endpoint")]
    MissingDocumentId { endpoint: String },

    /// The payload handed to a write is not a JSON object.
    #[error("invalid payload: {message}")]
    InvalidPayload { message: String },

    /// Errors raised by the backing document store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors originating from a document store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The caller is not allowed to access the collection.
    #[error("permission denied on {collection}: {message}")]
    PermissionDenied { collection: String, message: String },

    /// The backend is temporarily unavailable.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// The addressed document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A document with the same id already exists.
    #[error("document already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    /// The backend rejected the request as malformed.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The requested capability is not supported by this backend.
    #[error("capability '{capability}' not supported by {backend_name}")]
    UnsupportedCapability {
        backend_name: String,
        capability: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Creates an internal error without an underlying source.
    pub fn internal(backend_name: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Internal {
            backend_name: backend_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for errors that a read may downgrade to an empty result.
    ///
    /// Permission errors are what a hosted database returns for collections
    /// that do not exist yet under its access rules; unavailability is
    /// transient.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            StoreError::PermissionDenied { .. } | StoreError::Unavailable { .. }
        )
    }

    /// Classifies a backend status into a store error.
    ///
    /// `status` may be a gRPC/Firestore status name (`PERMISSION_DENIED`,
    /// `UNAVAILABLE`, ...) or an HTTP status code rendered as text.
    /// `NotFound` and `AlreadyExists` carry an empty `id`; callers that know
    /// the document id fill it in.
    pub fn from_status(
        backend_name: &str,
        collection: &str,
        status: &str,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        match status.trim().to_ascii_uppercase().as_str() {
            "PERMISSION_DENIED" | "UNAUTHENTICATED" | "401" | "403" => {
                StoreError::PermissionDenied {
                    collection: collection.to_string(),
                    message,
                }
            }
            "UNAVAILABLE" | "DEADLINE_EXCEEDED" | "RESOURCE_EXHAUSTED" | "429" | "502"
            | "503" | "504" => StoreError::Unavailable {
                backend_name: backend_name.to_string(),
                message,
            },
            "NOT_FOUND" | "404" => StoreError::NotFound {
                collection: collection.to_string(),
                id: String::new(),
            },
            "ALREADY_EXISTS" | "409" => StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: String::new(),
            },
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "400" => {
                StoreError::InvalidArgument { message }
            }
            _ => StoreError::internal(backend_name, format!("{}: {}", status, message)),
        }
    }
}

/// Why an endpoint could not be resolved to a collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The endpoint is the empty string or not a string at all.
    #[error("endpoint is empty or not a string")]
    EmptyEndpoint,

    /// No mapping matched and the first path segment is empty.
    #[error("endpoint '{endpoint}' has an empty first segment")]
    EmptySegment { endpoint: String },
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Store(err.into())
    }
}

#[cfg(feature = "firestore")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            StoreError::Unavailable {
                backend_name: "firestore".to_string(),
                message: err.to_string(),
            }
        } else {
            StoreError::Internal {
                backend_name: "firestore".to_string(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}
