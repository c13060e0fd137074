//! Walk-in Queue Server - Headless Daemon
//!
//! A pure Rust HTTP server that:
//! - Runs the assignment engine behind a REST API on /api/*
//! - Pushes committed queue changes to dashboards over /ws
//! - Provides operator commands for provisioning and inspection
//!
//! Access via: http://localhost:1000

mod api;
mod cli;
mod commands;
mod middleware;
mod rep_commands;
mod router;
mod server_utils;
mod state;

#[cfg(test)]
mod test_helpers;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use walkin_core::identity::gateway_from_config;
use walkin_core::modules::{config::load_config, logger::init_logging};
use walkin_core::{
    AssignmentEngine, EventBroadcaster, InMemoryQueueRepository, PostgresQueueRepository,
    QueueRepository,
};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config_path = cli.config.as_deref();
    match cli.command {
        None => run_server(config_path, None).await,
        Some(Commands::Serve { port }) => run_server(config_path, port).await,
        Some(Commands::Migrate) => commands::handle_migrate(config_path).await,
        Some(Commands::DbCheck) => commands::handle_db_check(config_path).await,
        Some(Commands::Rep(cmd)) => commands::handle_rep_command(config_path, cmd).await,
        Some(Commands::Customers(cmd)) => commands::handle_customer_command(config_path, cmd).await,
    }
}

async fn run_server(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    config.check()?;

    info!("🚀 Walk-in Queue Server starting on {}...", config.bind_address());

    let repo: Arc<dyn QueueRepository> = match config.database.url.as_deref() {
        Some(url) => {
            let repo = PostgresQueueRepository::connect(url, &config.database)
                .await
                .context("Failed to connect to PostgreSQL")?;
            repo.run_migrations().await.context("Failed to run migrations")?;
            info!("🐘 Using PostgreSQL store");
            Arc::new(repo)
        },
        None => {
            warn!("⚠️ No database URL configured, using in-memory store (data is lost on restart)");
            Arc::new(InMemoryQueueRepository::new())
        },
    };

    let events = Arc::new(EventBroadcaster::new(config.realtime.channel_capacity));
    let engine = AssignmentEngine::new(repo, events.clone());
    let gateway = gateway_from_config(&config.auth);
    info!("🔐 Identity gateway: {}", config.auth.mode);

    let bind_address = config.bind_address();
    let state = AppState::new(engine, gateway, config);
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    info!("🌐 Server listening on http://{}", bind_address);
    info!("🔌 API available at http://{}/api/", bind_address);
    info!("📡 Realtime channel at ws://{}/ws", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(server_utils::shutdown_and_close(events))
        .await?;

    info!("✅ Server stopped");
    Ok(())
}
