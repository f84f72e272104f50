use super::*;

fn disk_config(dir: &tempfile::TempDir, slot_count: usize) -> DeskConfig {
    DeskConfig::with_overrides(dir.path().to_str().unwrap(), slot_count)
}

#[test]
fn test_desk_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir, 5);

    let desk = OrderDesk::open(&config, test_catalog()).unwrap();
    desk.code_for("Brasil");
    desk.code_for("Alameda");
    fill_bulk_slot(&desk, 0, "Casa Lopez", 4);
    let created = desk.enqueue_ready_drafts(&[0]).unwrap();
    // A half-finished draft persists field by field.
    desk.set_slot_client(2, Some("Alameda".to_string())).unwrap();
    desk.set_slot_product(2, Some("Pollo")).unwrap();
    assert!(desk.flush_dirty().unwrap());
    drop(desk);

    let desk = OrderDesk::open(&config, test_catalog()).unwrap();

    // Sequencer comes back in mint order with its counter intact.
    let entries = desk.sequencer_entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].client_name, "Brasil");
    assert_eq!(entries[0].client_code, "C001");
    assert_eq!(entries[2].client_name, "Casa Lopez");
    assert_eq!(desk.code_for("Feria Nueva"), "C004");
    assert_eq!(desk.next_sub_number_for("Casa Lopez"), 2);

    // Queue and drafts are where they were.
    let queue = desk.queue();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, created[0].id);
    assert_eq!(queue[0].order_number, "C003.1");
    let slot = desk.slot(2).unwrap();
    assert_eq!(slot.client.as_deref(), Some("Alameda"));
    assert_eq!(slot.product.as_deref(), Some("Pollo"));
    assert!(!slot.ready);
}

#[test]
fn test_recovery_drops_slots_beyond_the_board() {
    let dir = tempfile::tempdir().unwrap();

    let desk = OrderDesk::open(&disk_config(&dir, 5), test_catalog()).unwrap();
    fill_bulk_slot(&desk, 4, "Casa Lopez", 4);
    assert!(desk.flush_dirty().unwrap());
    drop(desk);

    let desk = OrderDesk::open(&disk_config(&dir, 3), test_catalog()).unwrap();
    let board = desk.slots();
    assert_eq!(board.len(), 3);
    assert!(board.iter().all(|s| s.is_empty()));
}

#[test]
fn test_draft_backup_roundtrip_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir, 5);

    let desk = OrderDesk::open(&config, test_catalog()).unwrap();
    fill_bulk_slot(&desk, 2, "Casa Lopez", 9);
    desk.write_draft_backup().unwrap();
    drop(desk);

    let storage = DeskStorage::open(config.storage_path()).unwrap();
    let backup = storage.load_draft_backup().unwrap();
    assert_eq!(backup.len(), 5);
    assert_eq!(backup[2].client.as_deref(), Some("Casa Lopez"));
    assert!(backup[2].ready);
}

#[test]
fn test_flush_writes_only_when_dirty() {
    let desk = create_test_desk();

    assert!(!desk.flush_dirty().unwrap());

    desk.set_slot_client(0, Some("Casa Lopez".to_string())).unwrap();
    assert!(desk.flush_dirty().unwrap());
    assert!(!desk.flush_dirty().unwrap());
}

#[test]
fn test_shutdown_flushes_pending_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir, 5);

    let desk = OrderDesk::open(&config, test_catalog()).unwrap();
    desk.code_for("Casa Lopez");
    desk.shutdown();
    drop(desk);

    let desk = OrderDesk::open(&config, test_catalog()).unwrap();
    assert_eq!(desk.peek_code_for("Casa Lopez"), Some("C001".to_string()));
}
