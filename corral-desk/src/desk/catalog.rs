//! Read-only reference data consulted while composing orders.
//!
//! The catalog is handed to the desk at construction and never mutated by
//! the pipeline. It answers what a product requires (variety, sex split),
//! which presentations a product can be sold under, and which clients are
//! sellable. Inactive entries are dropped on construction.

use anyhow::Context;
use serde::de::DeserializeOwned;
use shared::models::{ClientRecord, Presentation, ProductType};
use std::collections::HashMap;
use std::path::Path;

/// Product, presentation and client reference data for one desk session.
#[derive(Debug, Clone, Default)]
pub struct DeskCatalog {
    products: HashMap<String, ProductType>,
    presentations: Vec<Presentation>,
    clients: Vec<ClientRecord>,
}

impl DeskCatalog {
    /// Build a catalog from externally provided collections, keeping only
    /// active entries.
    pub fn new(
        products: Vec<ProductType>,
        presentations: Vec<Presentation>,
        clients: Vec<ClientRecord>,
    ) -> Self {
        let products = products
            .into_iter()
            .filter(|p| p.is_active)
            .map(|p| (p.name.clone(), p))
            .collect();
        let presentations = presentations.into_iter().filter(|p| p.is_active).collect();
        let clients = clients.into_iter().filter(|c| c.is_active).collect();
        Self {
            products,
            presentations,
            clients,
        }
    }

    /// Load a catalog from JSON files in `dir`.
    ///
    /// Expects `products.json`, `presentations.json` and `clients.json`,
    /// each a plain array. A missing file reads as an empty collection; a
    /// malformed one is an error.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let products = read_json_array(&dir.join("products.json"))?;
        let presentations = read_json_array(&dir.join("presentations.json"))?;
        let clients = read_json_array(&dir.join("clients.json"))?;
        Ok(Self::new(products, presentations, clients))
    }

    /// Look up a product type by exact name.
    pub fn product(&self, name: &str) -> Option<&ProductType> {
        self.products.get(name)
    }

    /// Presentation names selectable for a product, in catalog order.
    pub fn presentations_for(&self, product: &str) -> Vec<&str> {
        self.presentations
            .iter()
            .filter(|p| p.product == product)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Sellable clients, in catalog order. Also the seed source for the
    /// sequencer cold start.
    pub fn clients(&self) -> &[ClientRecord] {
        &self.clients
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Catalog file absent, treating as empty");
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
