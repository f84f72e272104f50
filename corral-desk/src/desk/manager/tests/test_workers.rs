use super::*;
use crate::desk::persist_worker::{BackupScheduler, PersistWorker};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const DEBOUNCE: Duration = Duration::from_millis(500);

#[tokio::test(start_paused = true)]
async fn test_persist_worker_flushes_once_after_the_quiet_window() {
    let desk = Arc::new(create_test_desk());
    let shutdown = CancellationToken::new();
    let worker = PersistWorker::new(desk.clone(), DEBOUNCE, shutdown.clone());
    let handle = tokio::spawn(worker.run());

    // A burst of edits lands before the worker wakes; the notifier
    // coalesces the nudges into one.
    desk.code_for("Casa Lopez");
    fill_bulk_slot(&desk, 0, "Casa Lopez", 4);
    desk.enqueue_ready_drafts(&[0]).unwrap();
    tokio::task::yield_now().await;

    // Window still open: nothing has reached storage yet.
    let stats = desk.stats().unwrap();
    assert_eq!(stats.sequencer_entry_count, 0);
    assert_eq!(stats.draft_slot_count, 0);
    assert_eq!(stats.queued_order_count, 0);

    tokio::time::advance(Duration::from_millis(400)).await;
    tokio::task::yield_now().await;
    assert_eq!(desk.stats().unwrap().sequencer_entry_count, 0);

    tokio::time::advance(Duration::from_millis(200)).await;
    tokio::task::yield_now().await;

    // One pass carried all three dirty sections.
    let stats = desk.stats().unwrap();
    assert_eq!(stats.sequencer_entry_count, 1);
    assert_eq!(stats.draft_slot_count, 5);
    assert_eq!(stats.queued_order_count, 1);

    // The worker consumed the flags; a manual flush finds nothing left.
    assert!(!desk.flush_dirty().unwrap());

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_persist_worker_reopens_the_window_on_new_edits() {
    let desk = Arc::new(create_test_desk());
    let shutdown = CancellationToken::new();
    let worker = PersistWorker::new(desk.clone(), DEBOUNCE, shutdown.clone());
    let handle = tokio::spawn(worker.run());

    desk.code_for("Casa Lopez");
    tokio::task::yield_now().await;

    // A second edit 300ms in pushes the deadline out to 800ms.
    tokio::time::advance(Duration::from_millis(300)).await;
    desk.code_for("Avicola Norte");
    tokio::task::yield_now().await;

    // The original 500ms deadline passes without a flush.
    tokio::time::advance(Duration::from_millis(300)).await;
    tokio::task::yield_now().await;
    assert_eq!(desk.stats().unwrap().sequencer_entry_count, 0);

    // The reopened window closes and both edits land together.
    tokio::time::advance(Duration::from_millis(300)).await;
    tokio::task::yield_now().await;
    assert_eq!(desk.stats().unwrap().sequencer_entry_count, 2);
    assert!(!desk.flush_dirty().unwrap());

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_persist_worker_flushes_pending_state_on_shutdown() {
    let (desk, storage) = create_test_desk_sharing_storage();
    let desk = Arc::new(desk);
    let shutdown = CancellationToken::new();
    let worker = PersistWorker::new(desk.clone(), DEBOUNCE, shutdown.clone());
    let handle = tokio::spawn(worker.run());

    fill_bulk_slot(&desk, 1, "Restaurante El Sabor", 7);
    tokio::task::yield_now().await;
    assert_eq!(desk.stats().unwrap().draft_slot_count, 0);

    // Cancelled mid-window: the worker flushes on its way out.
    shutdown.cancel();
    handle.await.unwrap();

    let slots = storage.load_drafts().unwrap();
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[1].client.as_deref(), Some("Restaurante El Sabor"));
    assert!(!desk.flush_dirty().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_backup_scheduler_snapshots_on_a_fixed_cadence() {
    let (desk, storage) = create_test_desk_sharing_storage();
    let desk = Arc::new(desk);
    let shutdown = CancellationToken::new();
    let scheduler = BackupScheduler::new(desk.clone(), Duration::from_secs(10), shutdown.clone());
    let handle = tokio::spawn(scheduler.run());

    // The first tick fires at startup: an all-empty board snapshot.
    tokio::task::yield_now().await;
    let backup = storage.load_draft_backup().unwrap();
    assert_eq!(backup.len(), 5);
    assert!(backup.iter().all(|s| s.is_empty()));

    // Mid-draft state reaches the next snapshot whether or not the
    // debounced flush ever ran.
    fill_bulk_slot(&desk, 2, "Casa Lopez", 9);
    tokio::time::advance(Duration::from_secs(9)).await;
    tokio::task::yield_now().await;
    assert!(storage.load_draft_backup().unwrap()[2].is_empty());

    tokio::time::advance(Duration::from_secs(1)).await;
    tokio::task::yield_now().await;
    let backup = storage.load_draft_backup().unwrap();
    assert_eq!(backup[2].client.as_deref(), Some("Casa Lopez"));
    assert!(backup[2].ready);

    shutdown.cancel();
    handle.await.unwrap();
}
