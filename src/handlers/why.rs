//! Handler for the `why` command.

use super::status::level_icon;
use super::task::describe_rule;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use maintrack::engine::config::Config;
use maintrack::engine::db::Db;
use maintrack::engine::due::{approaching_margin, calendar_near_window_ms, Level};
use maintrack::engine::repo::TaskRepo;
use maintrack::engine::types::Task;
use maintrack::engine::view::{evaluate, Evaluation};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Explains how a task's due status was derived.
///
/// # Errors
/// Returns error if the task or its equipment cannot be resolved.
pub fn handle(config: &Config, now: DateTime<Utc>, task_id: i64) -> Result<()> {
    let db = Db::open(&config.db_path)?;
    let task = {
        let conn = db.connect()?;
        TaskRepo::new(&conn)
            .find_by_id(task_id)?
            .with_context(|| format!("Task not found: {task_id}"))?
    };

    let eval = evaluate(&task, now, &db, &db)?;
    let status = eval.view.status;

    println!(
        "{} [{}] {}",
        level_icon(status.level),
        task.id.to_string().cyan().bold(),
        task.name
    );
    println!("   Status:  {} ({})", status.level, status.level.color_hint().dimmed());
    println!("   Rule:    {}", describe_rule(&task));
    println!();

    print_baseline(&eval);
    print_due(&task, &eval, now);
    println!();
    print_reason(&task, &eval, now);

    Ok(())
}

fn print_baseline(eval: &Evaluation) {
    match &eval.entry {
        Some(entry) => println!(
            "{} last serviced {} at {} h (entry {})",
            "baseline:".dimmed(),
            entry.date.format("%Y-%m-%d"),
            entry.usage_hours_at_service,
            entry.id
        ),
        None => println!(
            "{} never serviced; counting from commission on {} at 0 h",
            "baseline:".dimmed(),
            eval.commission_date.format("%Y-%m-%d")
        ),
    }
}

fn print_due(task: &Task, eval: &Evaluation, now: DateTime<Utc>) {
    let status = eval.view.status;
    let days = (status.next_due_date - now).num_days();
    println!(
        "{}      {} ({} days from now)",
        "due:".dimmed(),
        status.next_due_date.format("%Y-%m-%d"),
        days
    );
    if task.usage_interval().is_some() {
        println!(
            "{}    {} h left (equipment at {} h)",
            "hours:".dimmed(),
            status.usage_hours_remaining,
            eval.current_usage_hours
        );
    }
}

fn print_reason(task: &Task, eval: &Evaluation, now: DateTime<Utc>) {
    let status = eval.view.status;
    let window_days = calendar_near_window_ms(task.calendar_months_interval) / MS_PER_DAY;
    let due_by_date = status.next_due_date <= now;

    match status.level {
        Level::Overdue if due_by_date => {
            println!("{} The due date has passed.", "reason:".red());
        }
        Level::Overdue => {
            println!(
                "{} Usage interval used up ({} h over).",
                "reason:".red(),
                -status.usage_hours_remaining
            );
        }
        Level::Approaching => {
            let margin = task.usage_interval().map(approaching_margin);
            match margin {
                Some(m) if status.usage_hours_remaining < m => println!(
                    "{} Fewer than {m} h left before service.",
                    "reason:".yellow()
                ),
                _ => println!(
                    "{} Due date is within {window_days:.1} days.",
                    "reason:".yellow()
                ),
            }
        }
        Level::OnTrack => {
            println!("{} Nothing due yet.", "reason:".green());
        }
    }
}
