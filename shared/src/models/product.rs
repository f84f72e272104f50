//! Product Type Model

use serde::{Deserialize, Serialize};

/// Product category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Bird,
    Other,
}

/// Product type entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductType {
    pub name: String,
    pub category: ProductCategory,
    /// Whether a variety must be selected before a line is complete
    pub requires_variety: bool,
    /// Whether quantity is entered as a male/female head-count split
    pub requires_sex_split: bool,
    /// Allowed varieties (empty unless `requires_variety`)
    #[serde(default)]
    pub varieties: Vec<String>,
    pub is_active: bool,
}
