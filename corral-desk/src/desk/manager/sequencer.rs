//! Client sequencer - code minting and sub-number allocation
//!
//! Client names are identity keys: matching is exact, with no case or
//! whitespace normalization. Codes and sub-numbers only ever move forward;
//! nothing is renumbered when orders are removed.

use super::{DeskState, DirtySections, OrderDesk};
use shared::order::ClientSequenceEntry;

impl DeskState {
    /// Existing code for the client, or a freshly minted one.
    pub(super) fn code_for(&mut self, client_name: &str) -> String {
        if let Some(entry) = self.entries.iter().find(|e| e.client_name == client_name) {
            return entry.client_code.clone();
        }
        self.mint_code(client_name)
    }

    /// Mint the next code and register the client.
    ///
    /// Codes are zero-padded to three digits and widen naturally past
    /// C999 (C1000, C1001, ...).
    fn mint_code(&mut self, client_name: &str) -> String {
        let code = format!("C{:03}", self.next_client_number);
        self.next_client_number += 1;
        self.entries.push(ClientSequenceEntry {
            client_name: client_name.to_string(),
            client_code: code.clone(),
            next_sub_number: 1,
        });
        tracing::debug!(client = %client_name, client_code = %code, "Client code minted");
        code
    }

    /// Hand out the client's current sub-number and advance the stored one.
    pub(super) fn next_sub_number(&mut self, client_name: &str) -> u32 {
        match self.entries.iter_mut().find(|e| e.client_name == client_name) {
            Some(entry) => {
                let n = entry.next_sub_number;
                entry.next_sub_number += 1;
                n
            }
            None => {
                // Callers mint the code first; registering here keeps the
                // allocation total for direct use.
                self.mint_code(client_name);
                self.next_sub_number(client_name)
            }
        }
    }
}

impl OrderDesk {
    /// Stable code for a client name, minting one on first sight.
    pub fn code_for(&self, client_name: &str) -> String {
        let mut state = self.state.write();
        let known = state.entries.iter().any(|e| e.client_name == client_name);
        let code = state.code_for(client_name);
        if !known {
            self.mark_dirty(
                &mut state,
                DirtySections {
                    sequencer: true,
                    ..Default::default()
                },
            );
        }
        code
    }

    /// Allocate the next sub-number for an already-registered client.
    pub fn next_sub_number_for(&self, client_name: &str) -> u32 {
        let mut state = self.state.write();
        let n = state.next_sub_number(client_name);
        self.mark_dirty(
            &mut state,
            DirtySections {
                sequencer: true,
                ..Default::default()
            },
        );
        n
    }

    /// Code for a client if one has been minted, without minting.
    pub fn peek_code_for(&self, client_name: &str) -> Option<String> {
        self.state
            .read()
            .entries
            .iter()
            .find(|e| e.client_name == client_name)
            .map(|e| e.client_code.clone())
    }

    /// Register codes for the catalog's client list on a cold start.
    ///
    /// Applies only when the sequencer is empty; a populated sequencer is
    /// authoritative over the catalog. Returns the number of codes minted.
    pub fn seed_clients(&self) -> usize {
        let mut state = self.state.write();
        if !state.entries.is_empty() {
            return 0;
        }
        for client in self.catalog.clients() {
            state.code_for(&client.name);
        }
        let minted = state.entries.len();
        if minted > 0 {
            self.mark_dirty(
                &mut state,
                DirtySections {
                    sequencer: true,
                    ..Default::default()
                },
            );
            tracing::info!(clients = minted, "Sequencer seeded from the client list");
        }
        minted
    }
}
