//! Matchday - daemon entry point
//!
//! Wires configuration, storage, the football feed, the periodic jobs and the
//! JSON-RPC trigger server, then runs until Ctrl+C.

mod config;
mod logging;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use matchday_api_rpc::RpcServer;
use matchday_core::application::{
    shutdown_channel, JobScheduler, Operations, PredictionService, SyncService,
};
use matchday_core::port::id_provider::UuidProvider;
use matchday_core::port::time_provider::SystemTimeProvider;
use matchday_infra_feed::HttpFootballFeed;
use matchday_infra_sqlite::{create_pool, database_url, repositories, run_migrations, schema_version};

use crate::config::AppConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration, then logging as configured
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let _log_guard = logging::init(&config.logging.format, config.log_directory().as_deref())?;

    info!("Matchday v{} starting...", VERSION);

    // 2. Database
    let db_path = config.database_path();
    if let Some(parent) = Path::new(&db_path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }
    info!(db_path = %db_path, "Initializing database...");

    let pool = create_pool(&database_url(&db_path))
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;
    let version = schema_version(&pool).await?;
    info!(schema_version = version, "Database ready");

    // 3. Dependency wiring
    let clock = Arc::new(SystemTimeProvider);
    let ids = Arc::new(UuidProvider);
    let repos = repositories(pool.clone());

    let feed_settings = config.feed_settings();
    info!(
        base_url = %feed_settings.base_url,
        competition = %feed_settings.competition,
        "Football feed configured"
    );
    let feed = Arc::new(HttpFootballFeed::new(feed_settings).context("Feed client setup failed")?);

    let sync = SyncService::new(feed, &repos, ids.clone(), clock.clone())
        .with_settings(config.sync_settings());
    let predictions = PredictionService::new(&repos, ids, clock.clone());
    let operations = Operations::new(sync, predictions, repos);

    // 4. JSON-RPC trigger server
    let (rpc_addr, rpc_handle) = RpcServer::new(config.rpc_config(), operations.clone())
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 5. Periodic jobs
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let jobs = JobScheduler::new(operations, clock, config.schedule_settings()).spawn(shutdown_rx);

    info!(rpc = %rpc_addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown: stop triggers, let in-flight runs finish
    shutdown_tx.shutdown();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    for job in jobs {
        match tokio::time::timeout(SHUTDOWN_GRACE, job).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Job task ended abnormally"),
            Err(_) => error!("Job did not stop within the grace period"),
        }
    }
    pool.close().await;

    info!("Shutdown complete.");
    Ok(())
}
