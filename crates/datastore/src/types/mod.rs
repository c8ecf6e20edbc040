//! Core types for the data access adapter.
//!
//! - [`Document`] - An opaque document with its id
//! - [`CollectionQuery`], [`OrderBy`], [`FetchOptions`] - Read requests
//! - [`Envelope`], [`Fetched`] - Response shapes
//!
//! # Examples
//!
//! ```
//! use staffhub_datastore::types::{FetchOptions, OrderBy};
//! use serde_json::json;
//!
//! let options = FetchOptions::new()
//!     .with_filters(json!({"status": "pending", "department": ""}))
//!     .with_order_by(OrderBy::desc("startDate"))
//!     .with_limit(20);
//!
//! let query = options.to_query();
//! assert_eq!(query.predicates.len(), 1);
//! ```

mod document;
mod envelope;
mod query;

pub use document::Document;
pub use envelope::{Envelope, Fetched};
pub use query::{CollectionQuery, FetchOptions, OrderBy, SortDirection};
