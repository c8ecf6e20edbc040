//! Core storage traits and abstractions.
//!
//! - [`DocumentStore`] - Document database client abstraction
//! - [`Subscription`] - Realtime snapshot stream returned by subscriptions
//!
//! Backends live in [`crate::backends`]; the seeding wrapper in
//! [`crate::seed`] is itself a `DocumentStore`, so wrappers compose.

pub mod store;
pub mod subscription;

pub use store::DocumentStore;
pub use subscription::{SNAPSHOT_BUFFER, SnapshotSender, Subscription};
