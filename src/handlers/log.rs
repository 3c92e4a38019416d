//! Handler for the `log` command.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use maintrack::engine::config::Config;
use maintrack::engine::db::Db;
use maintrack::engine::repo::{EntryRepo, EquipmentRepo, TaskRepo};
use maintrack::engine::types::Entry;
use tracing::warn;

/// Records that a task was serviced.
///
/// Without `--hours` the entry takes the equipment's current reading, rounded
/// up to a whole hour.
///
/// # Errors
/// Returns error if the task or its equipment cannot be found, or the insert fails.
pub fn handle(
    config: &Config,
    task_id: i64,
    hours: Option<i64>,
    date: DateTime<Utc>,
    remarks: Option<&str>,
) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;

    let task = TaskRepo::new(&conn)
        .find_by_id(task_id)?
        .with_context(|| format!("Task not found: {task_id}"))?;
    let equipment = EquipmentRepo::new(&conn)
        .find_by_id(task.equipment_id)?
        .with_context(|| format!("Equipment not found: {}", task.equipment_id))?;

    #[allow(clippy::cast_possible_truncation)]
    let current = equipment.usage_hours.ceil() as i64;
    let usage_hours = hours.unwrap_or(current);
    if usage_hours > current {
        warn!(
            task_id,
            usage_hours, current, "Logged reading is ahead of the equipment counter"
        );
    }

    let entry = Entry {
        id: 0,
        equipment_id: task.equipment_id,
        task_id,
        name: task.name.clone(),
        date,
        usage_hours_at_service: usage_hours,
        remarks: remarks.unwrap_or_default().to_string(),
    };
    let id = EntryRepo::new(&conn).add(&entry)?;

    println!(
        "{} Logged [{}] {} on {} at {} h",
        "✓".green(),
        id.to_string().yellow(),
        task.name,
        date.format("%Y-%m-%d"),
        usage_hours
    );
    Ok(())
}
