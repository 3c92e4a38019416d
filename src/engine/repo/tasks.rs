//! Task Repository: Recurrence rules bound to equipment.

use crate::engine::types::Task;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

const TASK_SELECT: &str =
    "SELECT id, equipment_id, name, description, usage_hours_interval, calendar_months_interval FROM tasks";

pub struct TaskRepo<'a> {
    conn: &'a Connection,
}

impl<'a> TaskRepo<'a> {
    /// Creates a new repository instance borrowing the connection.
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Validates and inserts a task. The `id` field is ignored.
    ///
    /// # Errors
    /// Returns an error if the recurrence rule is invalid or the insertion fails.
    pub fn add(&self, task: &Task) -> Result<i64> {
        task.validate()?;
        self.conn.execute(
            "INSERT INTO tasks (equipment_id, name, description, usage_hours_interval, calendar_months_interval)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.equipment_id,
                task.name,
                task.description,
                task.usage_hours_interval,
                task.calendar_months_interval
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(task_id = id, equipment_id = task.equipment_id, "Added task");
        Ok(id)
    }

    /// Retrieves all tasks, ordered by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_all(&self) -> Result<Vec<Task>> {
        let sql = format!("{TASK_SELECT} ORDER BY id");
        self.collect(&sql, [])
    }

    /// Retrieves the tasks bound to one piece of equipment.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_equipment(&self, equipment_id: i64) -> Result<Vec<Task>> {
        let sql = format!("{TASK_SELECT} WHERE equipment_id = ?1 ORDER BY id");
        self.collect(&sql, params![equipment_id])
    }

    /// Finds a task by its internal ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Task>> {
        let sql = format!("{TASK_SELECT} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_task)
            .optional()
            .context("Search by ID failed")
    }

    /// Deletes a task together with its service entries.
    ///
    /// Both deletes run in one transaction. Inside a caller's transaction
    /// they join it instead of opening their own.
    ///
    /// Returns false if no task had that id.
    ///
    /// # Errors
    /// Returns an error if a delete fails.
    pub fn remove(&self, id: i64) -> Result<bool> {
        let tx = if self.conn.is_autocommit() {
            Some(self.conn.unchecked_transaction()?)
        } else {
            None
        };
        self.conn
            .execute("DELETE FROM entries WHERE task_id = ?1", params![id])?;
        let removed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if let Some(tx) = tx {
            tx.commit()?;
        }
        debug!(task_id = id, removed = removed > 0, "Removed task");
        Ok(removed > 0)
    }

    fn collect<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_task)?;
        let mut tasks = Vec::new();
        for task in rows {
            tasks.push(task?);
        }
        Ok(tasks)
    }
}

/// Converts a database row to a Task object.
fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        equipment_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        usage_hours_interval: row.get(4)?,
        calendar_months_interval: row.get(5)?,
    })
}
