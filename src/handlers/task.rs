//! Handlers for the `task` subcommands.

use anyhow::{bail, Result};
use colored::Colorize;
use maintrack::engine::config::Config;
use maintrack::engine::db::Db;
use maintrack::engine::repo::{EquipmentRepo, TaskRepo};
use maintrack::engine::types::Task;

/// Adds a maintenance task to a piece of equipment.
///
/// # Errors
/// Returns error if the equipment is unknown or the recurrence rule is invalid.
pub fn add(
    config: &Config,
    equipment_id: i64,
    name: &str,
    description: Option<&str>,
    every_hours: i64,
    every_months: u32,
) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;

    let Some(equipment) = EquipmentRepo::new(&conn).find_by_id(equipment_id)? else {
        bail!("Equipment not found: {equipment_id}");
    };

    let task = Task {
        id: 0,
        equipment_id,
        name: name.to_string(),
        description: description.unwrap_or_default().to_string(),
        usage_hours_interval: every_hours,
        calendar_months_interval: every_months,
    };
    let id = TaskRepo::new(&conn).add(&task)?;

    println!(
        "{} Added task [{}] {} on {} ({})",
        "✓".green(),
        id.to_string().yellow(),
        name,
        equipment.name,
        describe_rule(&task).dimmed()
    );
    Ok(())
}

/// Lists task definitions.
///
/// # Errors
/// Returns error if database query fails.
pub fn list(config: &Config, equipment_id: Option<i64>) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;
    let repo = TaskRepo::new(&conn);
    let tasks = match equipment_id {
        Some(id) => repo.find_by_equipment(id)?,
        None => repo.get_all()?,
    };

    println!("{} Tasks:", "📋".cyan());
    if tasks.is_empty() {
        println!("   (No tasks defined)");
        return Ok(());
    }

    for task in tasks {
        println!(
            "   [{}] {} (equipment {}, {})",
            task.id.to_string().blue(),
            task.name,
            task.equipment_id,
            describe_rule(&task).dimmed()
        );
    }
    Ok(())
}

/// Deletes a task and its service history.
///
/// # Errors
/// Returns error if the task does not exist or the delete fails.
pub fn remove(config: &Config, id: i64) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let mut conn = db.connect()?;

    let tx = conn.transaction()?;
    if !TaskRepo::new(&tx).remove(id)? {
        bail!("Task not found: {id}");
    }
    tx.commit()?;

    println!("{} Removed task [{}]", "✓".green(), id.to_string().yellow());
    Ok(())
}

/// Renders a recurrence rule as "every 250 h or 12 months".
pub fn describe_rule(task: &Task) -> String {
    let hours = task.usage_interval().map(|h| format!("{h} h"));
    let months = (task.calendar_months_interval > 0)
        .then(|| format!("{} months", task.calendar_months_interval));
    match (hours, months) {
        (Some(h), Some(m)) => format!("every {h} or {m}"),
        (Some(h), None) => format!("every {h}"),
        (None, Some(m)) => format!("every {m}"),
        (None, None) => "no recurrence".to_string(),
    }
}
