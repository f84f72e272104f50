//! Presentation Model

use serde::{Deserialize, Serialize};

/// Presentation catalog entry (one selectable presentation per product)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Product type name this presentation belongs to
    pub product: String,
    pub name: String,
    pub is_active: bool,
}

/// Whether a presentation name denotes live birds sold by the crate.
///
/// Classification is a case-insensitive substring match on the name,
/// e.g. "Vivo", "vivo jaula".
pub fn is_live_presentation(name: &str) -> bool {
    name.to_lowercase().contains("vivo")
}
