//! Order Composition Module
//!
//! Types for the order numbering and confirmation pipeline:
//! - Draft slots: in-progress line-items under composition
//! - Queued orders: client-grouped bundles of ready line-items
//! - Confirmed records: immutable flattened output of confirmation

pub mod draft;
pub mod types;

// Re-exports
pub use draft::{DraftSlot, QuantityEntry};
pub use types::*;
