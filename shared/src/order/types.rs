//! Order pipeline types
//!
//! Queued orders are mutable while awaiting confirmation; confirmed records
//! are immutable once emitted. Lines are flat snapshots of their originating
//! draft slot and are independent of it afterwards.

use super::draft::DraftSlot;
use crate::util::now_millis;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-client numbering state
///
/// One entry per distinct client name. Codes are minted once and never
/// reassigned; `next_sub_number` starts at 1 and is never reused, even after
/// queued-order deletions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSequenceEntry {
    pub client_name: String,
    pub client_code: String,
    pub next_sub_number: u32,
}

/// One line-item of a queued order
///
/// Carries the raw counts as entered; the final quantity is resolved at
/// confirmation time, not stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLine {
    pub line_id: String,
    pub product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    pub presentation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub male_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub female_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_or_crate_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_per_crate: Option<u32>,
}

impl OrderLine {
    /// Snapshot a draft slot into an independent line with a fresh id.
    ///
    /// Editing the resulting line never touches the originating slot.
    pub fn from_slot(slot: &DraftSlot) -> Self {
        Self {
            line_id: uuid::Uuid::new_v4().to_string(),
            product: slot.product.clone().unwrap_or_default(),
            variety: slot.variety.clone(),
            presentation: slot.presentation.clone().unwrap_or_default(),
            male_count: slot.quantity.as_ref().and_then(|q| q.male_count()),
            female_count: slot.quantity.as_ref().and_then(|q| q.female_count()),
            total_or_crate_count: slot.quantity.as_ref().and_then(|q| q.total_or_crate_count()),
            units_per_crate: slot.quantity.as_ref().and_then(|q| q.units_per_crate()),
        }
    }

    /// Build a line from an add/edit payload with a fresh id.
    pub fn from_input(input: LineInput) -> Self {
        Self {
            line_id: uuid::Uuid::new_v4().to_string(),
            product: input.product,
            variety: input.variety,
            presentation: input.presentation,
            male_count: input.male_count,
            female_count: input.female_count,
            total_or_crate_count: input.total_or_crate_count,
            units_per_crate: input.units_per_crate,
        }
    }

    /// Whether at least one sex count was provided.
    pub fn has_sex_counts(&self) -> bool {
        self.male_count.is_some() || self.female_count.is_some()
    }
}

/// Line payload for add/edit operations on a queued order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineInput {
    pub product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    pub presentation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub male_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub female_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_or_crate_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_per_crate: Option<u32>,
}

/// Client-grouped bundle of ready line-items awaiting confirmation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueuedOrder {
    pub id: String,
    pub client: String,
    pub client_code: String,
    /// `{client_code}.{sub_number}`
    pub order_number: String,
    pub sub_number: u32,
    /// Numeric part of the client code, primary confirmation sort key
    pub base_priority: u32,
    pub line_items: Vec<OrderLine>,
    pub created_at: i64,
}

impl QueuedOrder {
    /// Create a queued order for one client group with a fresh id.
    ///
    /// `base_priority` is derived from the numeric part of the client code;
    /// `order_number` is `{client_code}.{sub_number}`.
    pub fn new(
        client: String,
        client_code: String,
        sub_number: u32,
        line_items: Vec<OrderLine>,
    ) -> Self {
        let base_priority = client_code.trim_start_matches('C').parse().unwrap_or(0);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            order_number: format!("{}.{}", client_code, sub_number),
            client,
            client_code,
            sub_number,
            base_priority,
            line_items,
            created_at: now_millis(),
        }
    }

    pub fn line_index(&self, line_id: &str) -> Option<usize> {
        self.line_items.iter().position(|l| l.line_id == line_id)
    }
}

/// Immutable flattened record handed to the confirmed-order store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfirmedOrderRecord {
    pub id: String,
    /// `{client_code}.{line_index + 1}`, indexed over the order's line list
    /// at confirmation time
    pub order_number: String,
    pub client_code: String,
    pub client: String,
    pub product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    pub presentation: String,
    pub final_quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crate_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units_per_crate: Option<u32>,
    pub priority: u32,
    pub date_created: String,
    pub time_created: String,
}

/// User-facing fault
///
/// Validation failures are reported as values, never as panics or process
/// errors; state stays unmutated when one is returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DeskFault {
    pub code: DeskFaultCode,
    pub message: String,
}

impl DeskFault {
    pub fn new(code: DeskFaultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// User-facing fault codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeskFaultCode {
    NoReadyDrafts,
    EmptyQueue,
    SlotNotFound,
    OrderNotFound,
    LineNotFound,
    ProductRequired,
    ProductUnknown,
    VarietyRequired,
    PresentationRequired,
    QuantityRequired,
    StoreRejected,
    StorageError,
    InternalError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_finds_by_line_id() {
        let order = QueuedOrder {
            id: "o-1".to_string(),
            client: "Feria Sur".to_string(),
            client_code: "C003".to_string(),
            order_number: "C003.1".to_string(),
            sub_number: 1,
            base_priority: 3,
            line_items: vec![
                OrderLine {
                    line_id: "l-1".to_string(),
                    product: "Pollo".to_string(),
                    variety: None,
                    presentation: "Vivo".to_string(),
                    male_count: Some(10),
                    female_count: None,
                    total_or_crate_count: None,
                    units_per_crate: None,
                },
                OrderLine {
                    line_id: "l-2".to_string(),
                    product: "Pavo".to_string(),
                    variety: None,
                    presentation: "Faenado".to_string(),
                    male_count: None,
                    female_count: None,
                    total_or_crate_count: Some(6),
                    units_per_crate: None,
                },
            ],
            created_at: 0,
        };
        assert_eq!(order.line_index("l-2"), Some(1));
        assert_eq!(order.line_index("l-9"), None);
    }

    #[test]
    fn test_queued_order_new_derives_number_and_priority() {
        let order = QueuedOrder::new(
            "Feria Sur".to_string(),
            "C012".to_string(),
            3,
            vec![],
        );
        assert_eq!(order.order_number, "C012.3");
        assert_eq!(order.base_priority, 12);
        assert!(!order.id.is_empty());

        let widened = QueuedOrder::new("X".to_string(), "C1000".to_string(), 1, vec![]);
        assert_eq!(widened.base_priority, 1000);
        assert_eq!(widened.order_number, "C1000.1");
    }

    #[test]
    fn test_from_slot_snapshots_quantity_fields() {
        use crate::models::{ProductCategory, ProductType};

        let product = ProductType {
            name: "Pollo".to_string(),
            category: ProductCategory::Bird,
            requires_variety: false,
            requires_sex_split: true,
            varieties: vec![],
            is_active: true,
        };

        let mut slot = DraftSlot::empty(0);
        slot.set_client(Some("Feria Sur".to_string()));
        slot.set_product(Some(&product));
        slot.set_male_count(Some(30));
        slot.set_female_count(Some(20));
        slot.set_presentation(Some("Vivo".to_string()));

        let a = OrderLine::from_slot(&slot);
        assert_eq!(a.product, "Pollo");
        assert_eq!(a.presentation, "Vivo");
        assert_eq!(a.male_count, Some(30));
        assert_eq!(a.female_count, Some(20));
        assert_eq!(a.total_or_crate_count, None);

        // Fresh id per snapshot, the slot stays untouched.
        let b = OrderLine::from_slot(&slot);
        assert_ne!(a.line_id, b.line_id);
        assert!(slot.ready);
    }
}
