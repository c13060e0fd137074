use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use walkin_core::{AssignmentEngine, QueueRepository};
use walkin_types::{Customer, CustomerStatus, RepIdentity, Representative, RepresentativeStatus};

pub async fn add_rep(engine: &AssignmentEngine, identity: &str, name: Option<&str>) -> Result<()> {
    let identity = RepIdentity::from(identity.trim());
    let rep = engine
        .provision_representative(&identity, name)
        .await
        .with_context(|| format!("Failed to provision representative {identity}"))?;
    println!("{} Representative #{} provisioned for {}", "✓".green(), rep.id, rep.identity);
    Ok(())
}

pub async fn reset_rep(engine: &AssignmentEngine, identity: &str) -> Result<()> {
    let rep = engine.reset(&RepIdentity::from(identity.trim())).await?;
    println!("{} Representative {} reset", "✓".green(), rep.identity);
    Ok(())
}

pub async fn list_reps<R: QueueRepository>(repo: &R, json: bool) -> Result<()> {
    let reps = repo.list_representatives().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reps)?);
        return Ok(());
    }

    if reps.is_empty() {
        println!("{}", "No representatives found.".yellow());
        return Ok(());
    }

    println!("{}", reps_table(&reps));
    println!("\n{} representatives total", reps.len());
    Ok(())
}

pub async fn list_customers<R: QueueRepository>(repo: &R, json: bool) -> Result<()> {
    let customers = repo.list_customers().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&customers)?);
        return Ok(());
    }

    if customers.is_empty() {
        println!("{}", "Queue is empty.".yellow());
        return Ok(());
    }

    let waiting = customers.iter().filter(|c| c.is_waiting()).count();
    println!("{}", customers_table(&customers));
    println!("\n{} customers total, {} waiting", customers.len(), waiting);
    Ok(())
}

fn reps_table(reps: &[Representative]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Identity", "Name", "Status", "Served", "Last finish"]);

    for rep in reps {
        let status = match rep.status {
            RepresentativeStatus::Available => Cell::new("Available").fg(Color::Green),
            RepresentativeStatus::Busy => Cell::new("Busy").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(rep.id),
            Cell::new(rep.identity.as_str()),
            Cell::new(rep.name.as_deref().unwrap_or("-")),
            status,
            Cell::new(rep.total_customers),
            Cell::new(format_time(rep.finished_at)),
        ]);
    }
    table
}

fn customers_table(customers: &[Customer]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Status", "Rep", "Arrived", "Finished"]);

    for customer in customers {
        let status = match customer.status {
            CustomerStatus::Waiting => Cell::new("Waiting").fg(Color::Cyan),
            CustomerStatus::BeingHelped => Cell::new("Being helped").fg(Color::Yellow),
            CustomerStatus::Helped => Cell::new("Helped").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(customer.id),
            Cell::new(&customer.name),
            status,
            Cell::new(customer.rep_id.map_or_else(|| "-".to_string(), |id| id.to_string())),
            Cell::new(customer.created_at.format("%H:%M:%S")),
            Cell::new(format_time(customer.finished_at)),
        ]);
    }
    table
}

fn format_time(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string())
}
