//! Draft slot state machine
//!
//! A draft slot is one in-progress line-item. Its `ready` flag and
//! `computed_total_units` are derived values, recomputed on every mutation.
//! Field dependencies are directional: changing the product invalidates
//! variety, counts and presentation; changing the variety invalidates the
//! presentation only. Incomplete slots stay non-ready, they never error.

use crate::models::{ProductType, is_live_presentation};
use serde::{Deserialize, Serialize};

/// Quantity entry, tagged by how the selected product is counted.
///
/// The variant is fixed at product selection time: sexed products take a
/// male/female head-count split, everything else takes a direct total that
/// doubles as a crate count on live presentations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuantityEntry {
    SexSplit {
        #[serde(skip_serializing_if = "Option::is_none")]
        male_count: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        female_count: Option<u32>,
    },
    Bulk {
        #[serde(skip_serializing_if = "Option::is_none")]
        total_or_crate_count: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        units_per_crate: Option<u32>,
    },
}

impl QuantityEntry {
    pub fn for_product(product: &ProductType) -> Self {
        if product.requires_sex_split {
            Self::SexSplit {
                male_count: None,
                female_count: None,
            }
        } else {
            Self::Bulk {
                total_or_crate_count: None,
                units_per_crate: None,
            }
        }
    }

    pub fn male_count(&self) -> Option<u32> {
        match self {
            Self::SexSplit { male_count, .. } => *male_count,
            Self::Bulk { .. } => None,
        }
    }

    pub fn female_count(&self) -> Option<u32> {
        match self {
            Self::SexSplit { female_count, .. } => *female_count,
            Self::Bulk { .. } => None,
        }
    }

    pub fn total_or_crate_count(&self) -> Option<u32> {
        match self {
            Self::SexSplit { .. } => None,
            Self::Bulk {
                total_or_crate_count,
                ..
            } => *total_or_crate_count,
        }
    }

    pub fn units_per_crate(&self) -> Option<u32> {
        match self {
            Self::SexSplit { .. } => None,
            Self::Bulk {
                units_per_crate, ..
            } => *units_per_crate,
        }
    }

    /// Whether at least one sex count was provided.
    pub fn has_sex_counts(&self) -> bool {
        matches!(
            self,
            Self::SexSplit {
                male_count,
                female_count,
            } if male_count.is_some() || female_count.is_some()
        )
    }

    /// Whether the quantity entry satisfies its variant's requirement.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::SexSplit { .. } => self.has_sex_counts(),
            Self::Bulk {
                total_or_crate_count,
                ..
            } => total_or_crate_count.is_some(),
        }
    }
}

/// One draft line-item under composition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DraftSlot {
    pub slot_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    /// Product type name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<QuantityEntry>,
    /// Derived: sex-count sum, or crate arithmetic on live presentations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_total_units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation: Option<String>,
    /// Snapshot of the selected product's variety requirement
    #[serde(default)]
    pub variety_required: bool,
    /// Derived: whether the slot can be sent to the queue
    #[serde(default)]
    pub ready: bool,
}

impl DraftSlot {
    pub fn empty(slot_id: u64) -> Self {
        Self {
            slot_id,
            client: None,
            product: None,
            variety: None,
            quantity: None,
            computed_total_units: None,
            presentation: None,
            variety_required: false,
            ready: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty(self.slot_id)
    }

    /// Reset to empty, keeping the slot position.
    pub fn reset(&mut self) {
        *self = Self::empty(self.slot_id);
    }

    pub fn set_client(&mut self, client: Option<String>) {
        self.client = non_empty(client);
        self.recompute();
    }

    /// Select a product. Variety, counts and presentation are invalidated;
    /// the quantity entry variant is fixed by the product's attributes.
    pub fn set_product(&mut self, product: Option<&ProductType>) {
        match product {
            Some(p) => {
                self.product = Some(p.name.clone());
                self.variety_required = p.requires_variety;
                self.quantity = Some(QuantityEntry::for_product(p));
            }
            None => {
                self.product = None;
                self.variety_required = false;
                self.quantity = None;
            }
        }
        self.variety = None;
        self.presentation = None;
        self.recompute();
    }

    /// Select a variety. The chosen presentation is invalidated.
    pub fn set_variety(&mut self, variety: Option<String>) {
        if self.product.is_none() {
            return;
        }
        self.variety = non_empty(variety);
        self.presentation = None;
        self.recompute();
    }

    pub fn set_male_count(&mut self, count: Option<u32>) {
        if let Some(QuantityEntry::SexSplit { male_count, .. }) = &mut self.quantity {
            *male_count = count;
            self.recompute();
        }
    }

    pub fn set_female_count(&mut self, count: Option<u32>) {
        if let Some(QuantityEntry::SexSplit { female_count, .. }) = &mut self.quantity {
            *female_count = count;
            self.recompute();
        }
    }

    pub fn set_total_or_crate_count(&mut self, count: Option<u32>) {
        if let Some(QuantityEntry::Bulk {
            total_or_crate_count,
            ..
        }) = &mut self.quantity
        {
            *total_or_crate_count = count;
            self.recompute();
        }
    }

    pub fn set_units_per_crate(&mut self, units: Option<u32>) {
        if let Some(QuantityEntry::Bulk {
            units_per_crate, ..
        }) = &mut self.quantity
        {
            *units_per_crate = units;
            self.recompute();
        }
    }

    pub fn set_presentation(&mut self, presentation: Option<String>) {
        if self.product.is_none() {
            return;
        }
        self.presentation = non_empty(presentation);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.computed_total_units = self.derive_total_units();
        self.ready = self.derive_ready();
    }

    fn derive_total_units(&self) -> Option<u32> {
        match &self.quantity {
            Some(entry @ QuantityEntry::SexSplit { .. }) if entry.has_sex_counts() => Some(
                entry
                    .male_count()
                    .unwrap_or(0)
                    .saturating_add(entry.female_count().unwrap_or(0)),
            ),
            Some(QuantityEntry::Bulk {
                total_or_crate_count: Some(count),
                units_per_crate: Some(units),
            }) if self.presentation.as_deref().is_some_and(is_live_presentation) => {
                Some(count.saturating_mul(*units))
            }
            _ => None,
        }
    }

    fn derive_ready(&self) -> bool {
        if self.client.is_none() || self.product.is_none() || self.presentation.is_none() {
            return false;
        }
        if self.variety_required && self.variety.is_none() {
            return false;
        }
        self.quantity.as_ref().is_some_and(QuantityEntry::is_filled)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
