//! Handler for the `status` command.

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use maintrack::engine::config::Config;
use maintrack::engine::db::Db;
use maintrack::engine::due::Level;
use maintrack::engine::repo::{EquipmentRepo, TaskRepo};
use maintrack::engine::view::{sort_by_urgency, to_views, TaskView};
use std::collections::HashMap;

/// Shows every task's due status, most urgent first.
///
/// # Errors
/// Returns error if a query fails or a task references missing equipment.
pub fn handle(
    config: &Config,
    now: DateTime<Utc>,
    equipment_id: Option<i64>,
    json: bool,
) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let conn = db.connect()?;
    let repo = TaskRepo::new(&conn);
    let tasks = match equipment_id {
        Some(id) => repo.find_by_equipment(id)?,
        None => repo.get_all()?,
    };

    let mut views = to_views(&tasks, now, &db, &db)?;
    sort_by_urgency(&mut views);

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    let names: HashMap<i64, String> = EquipmentRepo::new(&conn)
        .get_all()?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();
    print_human(&views, &names, now);
    Ok(())
}

fn print_human(views: &[TaskView], names: &HashMap<i64, String>, now: DateTime<Utc>) {
    println!(
        "{} Maintenance status as of {}",
        "🔧".cyan(),
        now.format("%Y-%m-%d")
    );

    if views.is_empty() {
        println!("   (No tasks defined)");
        return;
    }

    let attention = views.iter().filter(|v| v.status.level.needs_attention()).count();
    println!("   {} of {} tasks need attention", attention, views.len());
    println!();

    for view in views {
        let equipment = names
            .get(&view.equipment_id)
            .map_or("?", String::as_str);
        let hours = if view.usage_hours_interval < 0 {
            String::new()
        } else {
            format!(", {} h left", view.status.usage_hours_remaining)
        };
        println!(
            "   {} [{}] {} on {} ({}{})",
            level_icon(view.status.level),
            view.id.to_string().yellow(),
            view.name,
            equipment.bold(),
            format!("due {}", view.status.next_due_date.format("%Y-%m-%d")).dimmed(),
            hours.dimmed()
        );
    }
}

pub fn level_icon(level: Level) -> colored::ColoredString {
    match level {
        Level::OnTrack => "✓".green(),
        Level::Approaching => "⚡".yellow(),
        Level::Overdue => "✗".red(),
    }
}
