//! Client Model

use serde::{Deserialize, Serialize};

/// Sellable client entry
///
/// Client names are identity keys for order numbering: matching is exact and
/// case-sensitive, with no normalization of case, whitespace or accents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub is_active: bool,
}
