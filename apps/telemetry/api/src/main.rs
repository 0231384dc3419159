use axum_helpers::server::{ShutdownCoordinator, create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_events::{IngestMode, IngestionService, SqliteEventStore, ingest_channel};
use migration::Migrator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::sqlite::connect_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("SQLite connection failed: {}", e))?;

    database::sqlite::run_migrations::<Migrator>(&db, config.app.name).await?;

    let service = Arc::new(IngestionService::new(SqliteEventStore::new(db.clone())));
    let (coordinator, shutdown_rx) = ShutdownCoordinator::new();

    // The worker stops taking new events on shutdown and drains what is queued
    let (queue, worker) = match config.ingest.mode {
        IngestMode::Sync => (None, None),
        IngestMode::Deferred => {
            let (queue, worker) = ingest_channel(Arc::clone(&service), &config.ingest);
            let mut shutdown_rx = shutdown_rx;
            let handle = tokio::spawn(worker.run(async move {
                let _ = shutdown_rx.recv().await;
            }));
            (Some(queue), Some(handle))
        }
    };

    info!(
        mode = ?config.ingest.mode,
        queue_capacity = config.ingest.queue_capacity,
        max_in_flight = config.ingest.max_in_flight,
        "Event ingestion configured"
    );

    let state = AppState {
        config,
        db,
        service,
        queue,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    // /health: liveness with app name/version
    // /ready: database ping, plus the ingest queue in deferred mode
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting telemetry API (30s shutdown timeout)");

    let server_config = state.config.server.clone();
    create_production_app(
        app,
        &server_config,
        coordinator,
        Duration::from_secs(30),
        async move {
            if let Some(handle) = worker {
                match handle.await {
                    Ok(stats) => info!(?stats, "Deferred ingestion drained"),
                    Err(e) => error!("Ingest worker failed: {}", e),
                }
            }

            info!("Shutting down: closing database connections");
            match state.db.close().await {
                Ok(_) => info!("SQLite connection closed successfully"),
                Err(e) => error!("Error closing SQLite: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Telemetry API shutdown complete");
    Ok(())
}
