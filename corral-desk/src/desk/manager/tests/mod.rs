use super::*;
use crate::core::DeskConfig;
use crate::desk::catalog::DeskCatalog;
use crate::desk::storage::DeskStorage;
use shared::models::{ClientRecord, Presentation, ProductCategory, ProductType};
use shared::order::LineInput;

fn product(name: &str, requires_variety: bool, requires_sex_split: bool) -> ProductType {
    ProductType {
        name: name.to_string(),
        category: ProductCategory::Bird,
        requires_variety,
        requires_sex_split,
        varieties: if requires_variety {
            vec!["Roja".to_string(), "Negra".to_string()]
        } else {
            vec![]
        },
        is_active: true,
    }
}

fn presentation(product: &str, name: &str) -> Presentation {
    Presentation {
        product: product.to_string(),
        name: name.to_string(),
        is_active: true,
    }
}

fn client(name: &str) -> ClientRecord {
    ClientRecord {
        name: name.to_string(),
        locality: None,
        phone: None,
        is_active: true,
    }
}

/// Pollo is sex-split, Gallina demands a variety, Pavo is plain bulk.
fn test_catalog() -> DeskCatalog {
    DeskCatalog::new(
        vec![
            product("Pollo", false, true),
            product("Gallina", true, false),
            product("Pavo", false, false),
        ],
        vec![
            presentation("Pollo", "Vivo"),
            presentation("Pollo", "Faenado"),
            presentation("Gallina", "Faenado"),
            presentation("Pavo", "Vivo"),
            presentation("Pavo", "Faenado"),
        ],
        vec![
            client("Restaurante El Sabor"),
            client("Casa Lopez"),
            client("Avicola Norte"),
        ],
    )
}

fn create_test_desk() -> OrderDesk {
    create_test_desk_with_slots(5)
}

fn create_test_desk_with_slots(slot_count: usize) -> OrderDesk {
    let storage = DeskStorage::open_in_memory().unwrap();
    let config = DeskConfig::with_overrides("/tmp/corral-desk-tests", slot_count);
    OrderDesk::with_storage(storage, &config, test_catalog()).unwrap()
}

/// Like `create_test_desk`, but keeps a second handle on the store so the
/// test can inspect what was actually persisted.
fn create_test_desk_sharing_storage() -> (OrderDesk, DeskStorage) {
    let storage = DeskStorage::open_in_memory().unwrap();
    let config = DeskConfig::with_overrides("/tmp/corral-desk-tests", 5);
    let desk = OrderDesk::with_storage(storage.clone(), &config, test_catalog()).unwrap();
    (desk, storage)
}

// ========================================================================
// Helpers: drive a slot to ready
// ========================================================================

/// Pollo with a male/female head count, presentation Faenado.
fn fill_sexed_slot(desk: &OrderDesk, slot_id: u64, client: &str, male: u32, female: u32) {
    desk.set_slot_client(slot_id, Some(client.to_string())).unwrap();
    desk.set_slot_product(slot_id, Some("Pollo")).unwrap();
    desk.set_slot_male_count(slot_id, Some(male)).unwrap();
    desk.set_slot_female_count(slot_id, Some(female)).unwrap();
    let slot = desk
        .set_slot_presentation(slot_id, Some("Faenado".to_string()))
        .unwrap();
    assert!(slot.ready);
}

/// Pavo with a direct total, presentation Faenado.
fn fill_bulk_slot(desk: &OrderDesk, slot_id: u64, client: &str, total: u32) {
    desk.set_slot_client(slot_id, Some(client.to_string())).unwrap();
    desk.set_slot_product(slot_id, Some("Pavo")).unwrap();
    desk.set_slot_total_or_crate_count(slot_id, Some(total)).unwrap();
    let slot = desk
        .set_slot_presentation(slot_id, Some("Faenado".to_string()))
        .unwrap();
    assert!(slot.ready);
}

/// Pavo sold live by the crate.
fn fill_live_crate_slot(desk: &OrderDesk, slot_id: u64, client: &str, crates: u32, units: u32) {
    desk.set_slot_client(slot_id, Some(client.to_string())).unwrap();
    desk.set_slot_product(slot_id, Some("Pavo")).unwrap();
    desk.set_slot_total_or_crate_count(slot_id, Some(crates)).unwrap();
    desk.set_slot_units_per_crate(slot_id, Some(units)).unwrap();
    let slot = desk
        .set_slot_presentation(slot_id, Some("Vivo".to_string()))
        .unwrap();
    assert!(slot.ready);
}

/// A valid bulk line payload for Pavo.
fn bulk_line(total: u32) -> LineInput {
    LineInput {
        product: "Pavo".to_string(),
        variety: None,
        presentation: "Faenado".to_string(),
        male_count: None,
        female_count: None,
        total_or_crate_count: Some(total),
        units_per_crate: None,
    }
}

mod test_recovery;
mod test_sequencer;
mod test_workers;
