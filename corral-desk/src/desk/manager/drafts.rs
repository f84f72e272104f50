//! Draft board mutators
//!
//! Field edits funnel through the slot transition rules in `shared`; the
//! desk adds catalog lookups and dirty marking. Incomplete slots are not an
//! error, they simply stay non-ready.

use super::{DeskError, DeskResult, DirtySections, OrderDesk};
use shared::order::DraftSlot;

impl OrderDesk {
    /// Run one mutation against a slot under the write lock and return the
    /// updated slot.
    fn with_slot<F>(&self, slot_id: u64, apply: F) -> DeskResult<DraftSlot>
    where
        F: FnOnce(&mut DraftSlot),
    {
        let mut state = self.state.write();
        let slot = state
            .slots
            .iter_mut()
            .find(|s| s.slot_id == slot_id)
            .ok_or(DeskError::SlotNotFound(slot_id))?;
        apply(slot);
        let snapshot = slot.clone();
        self.mark_dirty(
            &mut state,
            DirtySections {
                drafts: true,
                ..Default::default()
            },
        );
        Ok(snapshot)
    }

    pub fn set_slot_client(&self, slot_id: u64, client: Option<String>) -> DeskResult<DraftSlot> {
        self.with_slot(slot_id, |slot| slot.set_client(client))
    }

    /// Select a product by catalog name. Dependent fields (variety,
    /// quantity, presentation) reset per the slot transition rules.
    pub fn set_slot_product(&self, slot_id: u64, product: Option<&str>) -> DeskResult<DraftSlot> {
        let product_type = match product {
            Some(name) => Some(
                self.catalog
                    .product(name)
                    .ok_or_else(|| DeskError::ProductUnknown(name.to_string()))?
                    .clone(),
            ),
            None => None,
        };
        self.with_slot(slot_id, |slot| slot.set_product(product_type.as_ref()))
    }

    pub fn set_slot_variety(&self, slot_id: u64, variety: Option<String>) -> DeskResult<DraftSlot> {
        self.with_slot(slot_id, |slot| slot.set_variety(variety))
    }

    pub fn set_slot_male_count(&self, slot_id: u64, count: Option<u32>) -> DeskResult<DraftSlot> {
        self.with_slot(slot_id, |slot| slot.set_male_count(count))
    }

    pub fn set_slot_female_count(&self, slot_id: u64, count: Option<u32>) -> DeskResult<DraftSlot> {
        self.with_slot(slot_id, |slot| slot.set_female_count(count))
    }

    pub fn set_slot_total_or_crate_count(
        &self,
        slot_id: u64,
        count: Option<u32>,
    ) -> DeskResult<DraftSlot> {
        self.with_slot(slot_id, |slot| slot.set_total_or_crate_count(count))
    }

    pub fn set_slot_units_per_crate(
        &self,
        slot_id: u64,
        units: Option<u32>,
    ) -> DeskResult<DraftSlot> {
        self.with_slot(slot_id, |slot| slot.set_units_per_crate(units))
    }

    pub fn set_slot_presentation(
        &self,
        slot_id: u64,
        presentation: Option<String>,
    ) -> DeskResult<DraftSlot> {
        self.with_slot(slot_id, |slot| slot.set_presentation(presentation))
    }

    /// Clear a slot back to empty.
    pub fn reset_slot(&self, slot_id: u64) -> DeskResult<DraftSlot> {
        self.with_slot(slot_id, |slot| slot.reset())
    }

    /// Ids of the slots currently ready to queue.
    pub fn ready_slot_ids(&self) -> Vec<u64> {
        self.state
            .read()
            .slots
            .iter()
            .filter(|s| s.ready)
            .map(|s| s.slot_id)
            .collect()
    }
}
