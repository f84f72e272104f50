//! Shared types for the Corral console
//!
//! Common types used across the desk crate and UI shells: catalog models,
//! draft/order types, user-facing fault codes, and small utilities.

pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use order::{
    ClientSequenceEntry, ConfirmedOrderRecord, DeskFault, DeskFaultCode, DraftSlot, LineInput,
    OrderLine, QuantityEntry, QueuedOrder,
};
