//! StaffHub Data Access Adapter
//!
//! This crate sits between the StaffHub HR application's UI data hooks and a
//! hosted document database. Hooks address data with REST-style endpoint
//! strings (`/leaves`, `/leaves/abc123`, `/employees?department=eng`); the
//! adapter maps those onto collections, turns loosely typed filter objects
//! into query predicates, and wraps every outcome in a uniform
//! `{success, data, error, message, source}` envelope.
//!
//! # Features
//!
//! - **Endpoint resolution**: exact, substring and first-segment lookup over
//!   an injected, ordered endpoint table
//! - **Filter normalization**: blank values dropped, strings trimmed, arrays
//!   turned into set membership
//! - **Degraded reads**: permission and availability errors on reads become
//!   empty results with an explanatory message
//! - **Realtime subscriptions** and **sample data seeding** for empty
//!   collections outside production
//!
//! # Backend Features
//!
//! ```toml
//! [dependencies]
//! staffhub-datastore = { version = "0.1", features = ["firestore"] }
//! ```
//!
//! - in-memory (always available)
//! - `firestore` - Cloud Firestore over its REST API
//!
//! # Architecture
//!
//! - [`endpoint`] - Endpoint to collection resolution
//! - [`filter`] - Filter normalization into predicates
//! - [`types`] - Documents, queries and response envelopes
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`DocumentStore`] trait and subscriptions
//! - [`backends`] - Store implementations
//! - [`seed`] - Sample data for empty collections
//! - [`service`] - The CRUD façade, [`DataService`]
//! - [`config`] - Adapter configuration
//!
//! # Quick Start
//!
//! ```
//! use staffhub_datastore::backends::memory::MemoryStore;
//! use staffhub_datastore::{AdapterConfig, DataService, EndpointMap, FetchOptions};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::new();
//! store.insert("leaves", "abc123", json!({"status": "pending", "days": 2}));
//!
//! let service = DataService::with_endpoint_map(
//!     store,
//!     EndpointMap::hr_defaults(),
//!     AdapterConfig::for_testing(),
//! );
//!
//! let options = FetchOptions::new().with_filters(json!({"status": "pending", "type": ""}));
//! let response = service.fetch_data("/leaves", &options).await;
//! assert!(response.success);
//! assert_eq!(response.data.unwrap()[0].id(), "abc123");
//!
//! let updated = service.update("/leaves/abc123", json!({"status": "approved"})).await;
//! assert!(updated.success);
//! # }
//! ```
//!
//! # Degraded Reads
//!
//! ```
//! use staffhub_datastore::backends::memory::MemoryStore;
//! use staffhub_datastore::{AdapterConfig, DataService, EndpointMap, FetchOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::new();
//! store.deny_collection("payroll");
//!
//! let service = DataService::with_endpoint_map(
//!     store,
//!     EndpointMap::hr_defaults(),
//!     AdapterConfig::for_testing(),
//! );
//!
//! let response = service.fetch_data("/payroll", &FetchOptions::new()).await;
//! assert!(response.success);
//! assert!(response.data.unwrap().is_empty());
//! assert!(response.message.is_some());
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod config;
pub mod core;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod seed;
pub mod service;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{AdapterConfig, Environment};
pub use endpoint::{EndpointMap, EndpointResolver};
pub use error::{AdapterError, AdapterResult, ResolveError, StoreError, StoreResult};
pub use filter::{FilterOperator, Predicate, normalize_filters};
pub use service::DataService;
pub use types::{CollectionQuery, Document, Envelope, FetchOptions, Fetched, OrderBy, SortDirection};

// Re-export core traits
pub use core::{DocumentStore, Subscription};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
