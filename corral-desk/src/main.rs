use corral_desk::{
    BackgroundTasks, BackupScheduler, DeskCatalog, DeskConfig, OrderDesk, PersistWorker, TaskKind,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration and set up logging
    let config = DeskConfig::from_env();
    corral_desk::init_logger_with_file(Some(&config.log_level), None);

    tracing::info!("Corral desk starting...");

    // 2. Load the catalog collections, if present
    let catalog = match DeskCatalog::load(&config.catalog_dir()) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog load failed, starting with an empty catalog");
            DeskCatalog::default()
        }
    };

    // 3. Open the desk, restoring any persisted state
    let desk = Arc::new(OrderDesk::open(&config, catalog)?);

    // 4. Start background tasks: sequencer seeding, debounced persistence,
    //    periodic draft backup
    let mut tasks = BackgroundTasks::new();

    {
        let desk = desk.clone();
        tasks.spawn("seed_clients", TaskKind::Warmup, async move {
            desk.seed_clients();
        });
    }

    let worker = PersistWorker::new(desk.clone(), config.debounce(), tasks.shutdown_token());
    tasks.spawn("persist_worker", TaskKind::Worker, worker.run());

    let backup = BackupScheduler::new(desk.clone(), config.backup_every(), tasks.shutdown_token());
    tasks.spawn("draft_backup", TaskKind::Periodic, backup.run());

    tasks.log_summary();

    // 5. Run until interrupted
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    tasks.shutdown().await;
    desk.shutdown();

    Ok(())
}
