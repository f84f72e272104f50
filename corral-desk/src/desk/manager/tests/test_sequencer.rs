use super::*;

#[test]
fn test_codes_are_minted_in_arrival_order() {
    let desk = create_test_desk();

    assert_eq!(desk.code_for("Casa Lopez"), "C001");
    assert_eq!(desk.code_for("Avicola Norte"), "C002");
    assert_eq!(desk.code_for("Casa Lopez"), "C001");

    let entries = desk.sequencer_entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].client_name, "Casa Lopez");
    assert_eq!(entries[1].client_code, "C002");
}

#[test]
fn test_client_names_are_matched_exactly() {
    let desk = create_test_desk();

    assert_eq!(desk.code_for("Casa Lopez"), "C001");
    assert_eq!(desk.code_for("casa lopez"), "C002");
    assert_eq!(desk.code_for("Casa Lopez "), "C003");
}

#[test]
fn test_code_suffix_widens_past_three_digits() {
    let desk = create_test_desk();

    for i in 0..1200 {
        desk.code_for(&format!("Client {}", i));
    }

    assert_eq!(desk.peek_code_for("Client 0"), Some("C001".to_string()));
    assert_eq!(desk.peek_code_for("Client 998"), Some("C999".to_string()));
    assert_eq!(desk.peek_code_for("Client 999"), Some("C1000".to_string()));
    assert_eq!(desk.peek_code_for("Client 1199"), Some("C1200".to_string()));
}

#[test]
fn test_sub_numbers_advance_per_client() {
    let desk = create_test_desk();

    desk.code_for("Casa Lopez");
    desk.code_for("Avicola Norte");

    assert_eq!(desk.next_sub_number_for("Casa Lopez"), 1);
    assert_eq!(desk.next_sub_number_for("Casa Lopez"), 2);
    assert_eq!(desk.next_sub_number_for("Avicola Norte"), 1);
    assert_eq!(desk.next_sub_number_for("Casa Lopez"), 3);
}

#[test]
fn test_peek_does_not_mint() {
    let desk = create_test_desk();

    assert_eq!(desk.peek_code_for("Casa Lopez"), None);
    assert!(desk.sequencer_entries().is_empty());

    desk.code_for("Casa Lopez");
    assert_eq!(desk.peek_code_for("Casa Lopez"), Some("C001".to_string()));
}

#[test]
fn test_seed_clients_registers_catalog_list_once() {
    let desk = create_test_desk();

    assert_eq!(desk.seed_clients(), 3);
    assert_eq!(
        desk.peek_code_for("Restaurante El Sabor"),
        Some("C001".to_string())
    );
    assert_eq!(desk.peek_code_for("Avicola Norte"), Some("C003".to_string()));

    // A populated sequencer is left alone.
    assert_eq!(desk.seed_clients(), 0);
    assert_eq!(desk.sequencer_entries().len(), 3);
}

#[test]
fn test_seed_clients_skips_populated_sequencer() {
    let desk = create_test_desk();

    desk.code_for("Feria Walk-in");
    assert_eq!(desk.seed_clients(), 0);
    assert_eq!(desk.sequencer_entries().len(), 1);
}
