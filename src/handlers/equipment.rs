//! Handlers for the `equipment` subcommands.

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use maintrack::engine::config::Config;
use maintrack::engine::db::Db;
use maintrack::engine::repo::EquipmentRepo;

/// Registers a piece of equipment.
///
/// # Errors
/// Returns error if the reading is invalid or the insert fails.
pub fn add(
    config: &Config,
    name: &str,
    usage_hours: f64,
    commissioned: DateTime<Utc>,
) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;
    let id = EquipmentRepo::new(&conn).add(name, usage_hours, commissioned)?;
    println!(
        "{} Added equipment [{}] {} ({usage_hours} h, commissioned {})",
        "✓".green(),
        id.to_string().yellow(),
        name,
        commissioned.format("%Y-%m-%d")
    );
    Ok(())
}

/// Lists all equipment with its current reading.
///
/// # Errors
/// Returns error if database query fails.
pub fn list(config: &Config) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;
    let equipment = EquipmentRepo::new(&conn).get_all()?;

    println!("{} Equipment:", "⚙".cyan());
    if equipment.is_empty() {
        println!("   (None registered)");
        return Ok(());
    }

    for e in equipment {
        println!(
            "   [{}] {}  {}  {}",
            e.id.to_string().blue(),
            e.name,
            format!("{} h", e.usage_hours).bold(),
            format!("since {}", e.commission_date.format("%Y-%m-%d")).dimmed()
        );
    }
    Ok(())
}

/// Records a new usage-hours reading.
///
/// # Errors
/// Returns error if the equipment is unknown or the reading goes backwards.
pub fn hours(config: &Config, id: i64, usage_hours: f64) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;
    EquipmentRepo::new(&conn).update_usage_hours(id, usage_hours)?;
    println!(
        "{} Equipment [{}] now at {} h",
        "✓".green(),
        id.to_string().yellow(),
        usage_hours
    );
    Ok(())
}
