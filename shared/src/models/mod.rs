//! Catalog models
//!
//! Read-only collections handed to the desk by the hosting application:
//! product types, presentations, and the sellable client list.

pub mod client;
pub mod presentation;
pub mod product;

// Re-exports
pub use client::*;
pub use presentation::*;
pub use product::*;
