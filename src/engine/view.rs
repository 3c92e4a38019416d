//! Task View Assembler: joins a task with its derived due status.
//!
//! Resolves the two inputs the calculator needs (latest entry and equipment
//! snapshot) once per evaluation, in parallel, then hands them to the pure
//! `compute_status`.

use super::due::{compute_status, DueStatus};
use super::error::{EngineError, Result};
use super::history::{latest_entry, EntryHistory};
use super::snapshot::{resolve_snapshot, EquipmentSource};
use super::types::{Entry, Task};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Reverse;
use std::thread;
use tracing::debug;

/// A task flattened together with its due status, ready for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: i64,
    pub equipment_id: i64,
    pub name: String,
    pub description: String,
    pub usage_hours_interval: i64,
    pub calendar_months_interval: u32,
    /// Date of the entry the status was measured from, if any.
    pub last_service_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub status: DueStatus,
}

impl TaskView {
    fn new(task: &Task, last_entry: Option<&Entry>, status: DueStatus) -> Self {
        Self {
            id: task.id,
            equipment_id: task.equipment_id,
            name: task.name.clone(),
            description: task.description.clone(),
            usage_hours_interval: task.usage_hours_interval,
            calendar_months_interval: task.calendar_months_interval,
            last_service_date: last_entry.map(|e| e.date),
            status,
        }
    }
}

/// The inputs a status was derived from, kept for explanation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub view: TaskView,
    pub entry: Option<Entry>,
    pub current_usage_hours: f64,
    pub commission_date: DateTime<Utc>,
}

/// Builds the external view of one task.
///
/// # Errors
/// Returns `ReferenceNotFound` if the task's equipment does not exist, or
/// any lookup error from the stores.
pub fn to_view<H, S>(
    task: &Task,
    now: DateTime<Utc>,
    history: &H,
    equipment: &S,
) -> Result<TaskView>
where
    H: EntryHistory + ?Sized,
    S: EquipmentSource + ?Sized,
{
    evaluate(task, now, history, equipment).map(|e| e.view)
}

/// Like `to_view`, but also returns the resolved entry and snapshot.
///
/// # Errors
/// Same as `to_view`.
pub fn evaluate<H, S>(
    task: &Task,
    now: DateTime<Utc>,
    history: &H,
    equipment: &S,
) -> Result<Evaluation>
where
    H: EntryHistory + ?Sized,
    S: EquipmentSource + ?Sized,
{
    let (entry, snapshot) = thread::scope(|scope| {
        let entry = scope.spawn(|| latest_entry(history, task.equipment_id, task.id));
        let snapshot = resolve_snapshot(equipment, task.equipment_id);
        let entry = entry
            .join()
            .map_err(|_| EngineError::Lookup(format!("entry lookup for task {} panicked", task.id)));
        (entry, snapshot)
    });
    let snapshot = snapshot?;
    let entry = entry??;

    let status = compute_status(task, entry.as_ref(), &snapshot, now)?;
    debug!(
        task_id = task.id,
        level = %status.level,
        hours_left = status.usage_hours_remaining,
        next_due = %status.next_due_date,
        "Evaluated task"
    );

    Ok(Evaluation {
        view: TaskView::new(task, entry.as_ref(), status),
        entry,
        current_usage_hours: snapshot.current_usage_hours,
        commission_date: snapshot.commission_date,
    })
}

/// Batch-builds views for many tasks, failing on the first error.
///
/// # Errors
/// Same as `to_view`.
pub fn to_views<H, S>(
    tasks: &[Task],
    now: DateTime<Utc>,
    history: &H,
    equipment: &S,
) -> Result<Vec<TaskView>>
where
    H: EntryHistory + ?Sized,
    S: EquipmentSource + ?Sized,
{
    tasks
        .iter()
        .map(|task| to_view(task, now, history, equipment))
        .collect()
}

/// Orders views most urgent first: level, then earliest due date, then id.
pub fn sort_by_urgency(views: &mut [TaskView]) {
    views.sort_by_key(|v| (Reverse(v.status.level), v.status.next_due_date, v.id));
}
