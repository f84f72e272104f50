//! Order queue - grouping ready drafts and editing queued lines
//!
//! Queueing groups ready drafts by client so one client yields one order
//! per batch, no matter how many slots mention them. Line edits after
//! queueing are validated against the catalog but bypass the slot state
//! machine.

use super::{DeskError, DeskResult, DirtySections, OrderDesk};
use shared::order::{LineInput, OrderLine, QueuedOrder};

impl OrderDesk {
    /// Send the named draft slots to the queue, grouped by client in
    /// first-seen order. Slots that are not ready are skipped; the ones
    /// queued are reset to empty. Returns the orders created.
    pub fn enqueue_ready_drafts(&self, slot_ids: &[u64]) -> DeskResult<Vec<QueuedOrder>> {
        let mut state = self.state.write();

        let mut ready: Vec<usize> = Vec::new();
        for &slot_id in slot_ids {
            let idx = state
                .slots
                .iter()
                .position(|s| s.slot_id == slot_id)
                .ok_or(DeskError::SlotNotFound(slot_id))?;
            if state.slots[idx].ready && !ready.contains(&idx) {
                ready.push(idx);
            }
        }
        if ready.is_empty() {
            return Err(DeskError::NoReadyDrafts);
        }

        // Group slot indices by client, preserving first-seen order.
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        for idx in ready {
            let client = state.slots[idx].client.clone().unwrap_or_default();
            match groups.iter_mut().find(|(name, _)| *name == client) {
                Some((_, idxs)) => idxs.push(idx),
                None => groups.push((client, vec![idx])),
            }
        }

        let mut created = Vec::with_capacity(groups.len());
        for (client, idxs) in groups {
            let code = state.code_for(&client);
            let sub_number = state.next_sub_number(&client);
            let lines: Vec<OrderLine> = idxs
                .iter()
                .map(|&i| OrderLine::from_slot(&state.slots[i]))
                .collect();
            let order = QueuedOrder::new(client, code, sub_number, lines);
            tracing::info!(
                order_number = %order.order_number,
                lines = order.line_items.len(),
                "Order queued"
            );
            state.queue.push(order.clone());
            created.push(order);
            for &i in &idxs {
                state.slots[i].reset();
            }
        }

        self.mark_dirty(
            &mut state,
            DirtySections {
                sequencer: true,
                drafts: true,
                queue: true,
            },
        );
        Ok(created)
    }

    /// Validate a line payload against the catalog and the product's
    /// quantity mode.
    fn validate_line(&self, input: &LineInput) -> DeskResult<()> {
        if input.product.trim().is_empty() {
            return Err(DeskError::ProductRequired);
        }
        let product = self
            .catalog
            .product(&input.product)
            .ok_or_else(|| DeskError::ProductUnknown(input.product.clone()))?;
        if product.requires_variety
            && input
                .variety
                .as_deref()
                .is_none_or(|v| v.trim().is_empty())
        {
            return Err(DeskError::VarietyRequired(product.name.clone()));
        }
        if input.presentation.trim().is_empty() {
            return Err(DeskError::PresentationRequired);
        }
        if product.requires_sex_split {
            if input.male_count.is_none() && input.female_count.is_none() {
                return Err(DeskError::QuantityRequired(
                    "a male or female count must be set".to_string(),
                ));
            }
        } else if input.total_or_crate_count.is_none() {
            return Err(DeskError::QuantityRequired(
                "a total or crate count must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Append a line to a queued order.
    pub fn add_line_to_order(&self, order_id: &str, input: LineInput) -> DeskResult<OrderLine> {
        self.validate_line(&input)?;

        let mut state = self.state.write();
        let order = state
            .queue
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| DeskError::OrderNotFound(order_id.to_string()))?;
        let line = OrderLine::from_input(input);
        order.line_items.push(line.clone());
        tracing::debug!(order_id = %order_id, line_id = %line.line_id, "Line added");
        self.mark_dirty(
            &mut state,
            DirtySections {
                queue: true,
                ..Default::default()
            },
        );
        Ok(line)
    }

    /// Replace a queued line in place, keeping its id and position.
    pub fn edit_line(
        &self,
        order_id: &str,
        line_id: &str,
        input: LineInput,
    ) -> DeskResult<OrderLine> {
        self.validate_line(&input)?;

        let mut state = self.state.write();
        let order = state
            .queue
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| DeskError::OrderNotFound(order_id.to_string()))?;
        let idx = order
            .line_index(line_id)
            .ok_or_else(|| DeskError::LineNotFound(line_id.to_string()))?;
        let mut line = OrderLine::from_input(input);
        line.line_id = line_id.to_string();
        order.line_items[idx] = line.clone();
        self.mark_dirty(
            &mut state,
            DirtySections {
                queue: true,
                ..Default::default()
            },
        );
        Ok(line)
    }

    /// Remove a line. Removing the last line removes the whole order; its
    /// sub-number is not reused.
    pub fn remove_line(&self, order_id: &str, line_id: &str) -> DeskResult<()> {
        let mut state = self.state.write();
        let order_idx = state
            .queue
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| DeskError::OrderNotFound(order_id.to_string()))?;
        let line_idx = state.queue[order_idx]
            .line_index(line_id)
            .ok_or_else(|| DeskError::LineNotFound(line_id.to_string()))?;
        state.queue[order_idx].line_items.remove(line_idx);
        if state.queue[order_idx].line_items.is_empty() {
            let removed = state.queue.remove(order_idx);
            tracing::info!(
                order_number = %removed.order_number,
                "Order removed with its last line"
            );
        }
        self.mark_dirty(
            &mut state,
            DirtySections {
                queue: true,
                ..Default::default()
            },
        );
        Ok(())
    }

    /// Remove a whole queued order.
    pub fn remove_order(&self, order_id: &str) -> DeskResult<QueuedOrder> {
        let mut state = self.state.write();
        let idx = state
            .queue
            .iter()
            .position(|o| o.id == order_id)
            .ok_or_else(|| DeskError::OrderNotFound(order_id.to_string()))?;
        let removed = state.queue.remove(idx);
        tracing::info!(order_number = %removed.order_number, "Order removed");
        self.mark_dirty(
            &mut state,
            DirtySections {
                queue: true,
                ..Default::default()
            },
        );
        Ok(removed)
    }
}
