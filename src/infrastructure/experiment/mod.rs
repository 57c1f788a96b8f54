//! Infrastructure layer for the vendor's experiment state
//!
//! Provides the in-memory experiment source, the vendor snapshot format and
//! the variation resolver.

mod in_memory_source;
mod resolver;
mod snapshot;

pub use in_memory_source::InMemoryExperimentSource;
pub use resolver::{Resolution, UnresolvedReason, VariationResolver};
pub use snapshot::{VendorExperiment, VendorSnapshot};
