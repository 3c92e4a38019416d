//! Handler for the `history` command.

use anyhow::{Context, Result};
use colored::Colorize;
use maintrack::engine::config::Config;
use maintrack::engine::db::Db;
use maintrack::engine::repo::{EntryRepo, TaskRepo};

/// Displays the service history of a task, newest first.
///
/// # Errors
/// Returns error if the task is unknown or the database query fails.
pub fn handle(config: &Config, task_id: i64) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;

    let task = TaskRepo::new(&conn)
        .find_by_id(task_id)?
        .with_context(|| format!("Task not found: {task_id}"))?;
    let history = EntryRepo::new(&conn).get_history(task.equipment_id, task.id)?;

    println!("{} Service history for {}", "📜".cyan(), task.name.bold());
    println!();

    if history.is_empty() {
        println!("   (Never serviced)");
        return Ok(());
    }

    for entry in history {
        let remarks = if entry.remarks.is_empty() {
            String::new()
        } else {
            format!("  {}", entry.remarks.dimmed())
        };
        println!(
            "   [{}]  {}  {}{}",
            entry.id.to_string().blue(),
            entry.date.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            format!("{} h", entry.usage_hours_at_service).bold(),
            remarks
        );
    }

    Ok(())
}
