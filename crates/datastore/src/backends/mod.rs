//! Document store implementations.
//!
//! Each backend implements [`DocumentStore`](crate::core::DocumentStore).
//! Networked backends are gated behind a feature flag.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | (always) | In-process collections for development and tests |
//! | Firestore | `firestore` | Cloud Firestore over its REST API |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "firestore")]
//! use staffhub_datastore::backends::firestore::{FirestoreConfig, FirestoreStore};
//!
//! # #[cfg(feature = "firestore")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FirestoreConfig::new("staffhub-prod").with_bearer_token("ya29...");
//! let store = FirestoreStore::new(config)?;
//! # Ok(())
//! # }
//! ```

pub mod memory;

#[cfg(feature = "firestore")]
pub mod firestore;
