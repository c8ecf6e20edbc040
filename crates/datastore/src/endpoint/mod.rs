//! Endpoint resolution.
//!
//! UI hooks address data with REST-style endpoint strings (`/leaves`,
//! `/leaves/abc123`, `/performance/overview?period=month`). These are not
//! network routes; they are keys that this module maps onto document store
//! collections through an injected [`EndpointMap`].

mod map;
mod path;
mod resolver;

pub use map::{EndpointMap, EndpointMapBuilder, EndpointMapping};
pub use path::{clean_endpoint, document_id, first_segment};
pub use resolver::{DEFAULT_COLLECTION, EndpointResolver, MatchKind, Resolution};
