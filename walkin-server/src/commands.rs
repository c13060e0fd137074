use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use walkin_core::modules::config::load_config;
use walkin_core::{AssignmentEngine, EventBroadcaster, PostgresQueueRepository};

use crate::cli::{CustomerCommands, RepCommands};
use crate::rep_commands;

/// Connect to the configured database. Operator commands have no in-memory
/// fallback: there would be nothing to inspect.
pub(crate) async fn connect_store(config_path: Option<&Path>) -> Result<PostgresQueueRepository> {
    let config = load_config(config_path)?;
    let url = config
        .database
        .url
        .as_deref()
        .context("database.url (or DATABASE_URL) is required for this command")?;

    PostgresQueueRepository::connect(url, &config.database)
        .await
        .context("Failed to connect to PostgreSQL")
}

/// Engine for one-shot operator writes. A CLI process has no realtime
/// subscribers, so its broadcaster only needs a token capacity.
fn operator_engine(repo: PostgresQueueRepository) -> AssignmentEngine {
    AssignmentEngine::new(Arc::new(repo), Arc::new(EventBroadcaster::new(16)))
}

pub async fn handle_migrate(config_path: Option<&Path>) -> Result<()> {
    let repo = connect_store(config_path).await?;
    repo.run_migrations().await?;
    println!("{} Migrations applied", "✓".green());
    Ok(())
}

pub async fn handle_db_check(config_path: Option<&Path>) -> Result<()> {
    let repo = connect_store(config_path).await?;
    let now = repo.server_time().await?;
    println!("{} Connected to PostgreSQL", "✓".green());
    println!("  Server time: {}", now.to_rfc3339());
    Ok(())
}

pub async fn handle_rep_command(config_path: Option<&Path>, cmd: RepCommands) -> Result<()> {
    let repo = connect_store(config_path).await?;
    match cmd {
        RepCommands::Add { identity, name } => {
            rep_commands::add_rep(&operator_engine(repo), &identity, name.as_deref()).await
        },
        RepCommands::List { json } => rep_commands::list_reps(&repo, json).await,
        RepCommands::Reset { identity } => {
            rep_commands::reset_rep(&operator_engine(repo), &identity).await
        },
    }
}

pub async fn handle_customer_command(
    config_path: Option<&Path>,
    cmd: CustomerCommands,
) -> Result<()> {
    let repo = connect_store(config_path).await?;
    match cmd {
        CustomerCommands::List { json } => rep_commands::list_customers(&repo, json).await,
    }
}
