//! Test infrastructure for the data access adapter.
//!
//! Fixtures for HR documents and a scripted store that counts calls and
//! fails on demand.

pub mod fixtures;
pub mod harness;

// Re-export commonly used items
pub use fixtures::*;
pub use harness::*;
