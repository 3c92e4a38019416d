//! Entry Repository: Completed service events.

use crate::engine::history::sort_newest_first;
use crate::engine::types::Entry;
use anyhow::{bail, Result};
use rusqlite::{params, Connection, OptionalExtension};

const ENTRY_SELECT: &str =
    "SELECT id, equipment_id, task_id, name, performed_at, usage_hours, remarks FROM entries";

pub struct EntryRepo<'a> {
    conn: &'a Connection,
}

impl<'a> EntryRepo<'a> {
    /// Creates a new entry repository instance.
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Records a service event. The `id` field is ignored.
    ///
    /// # Errors
    /// Returns an error if the reading is out of range, the task is unknown
    /// or bound to other equipment, or the entry cannot be saved.
    pub fn add(&self, entry: &Entry) -> Result<i64> {
        entry.validate()?;
        let owner: Option<i64> = self
            .conn
            .query_row(
                "SELECT equipment_id FROM tasks WHERE id = ?1",
                params![entry.task_id],
                |row| row.get(0),
            )
            .optional()?;
        match owner {
            None => bail!("Task not found: {}", entry.task_id),
            Some(id) if id != entry.equipment_id => bail!(
                "Task {} belongs to equipment {id}, not {}",
                entry.task_id,
                entry.equipment_id
            ),
            Some(_) => {}
        }

        self.conn.execute(
            "INSERT INTO entries (equipment_id, task_id, name, performed_at, usage_hours, remarks)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.equipment_id,
                entry.task_id,
                entry.name,
                entry.date,
                entry.usage_hours_at_service,
                entry.remarks
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Returns every entry for an equipment/task pair, in storage order.
    ///
    /// # Errors
    /// Returns a `rusqlite` error if query logic fails.
    pub fn find(&self, equipment_id: i64, task_id: i64) -> rusqlite::Result<Vec<Entry>> {
        let sql = format!("{ENTRY_SELECT} WHERE equipment_id = ?1 AND task_id = ?2");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![equipment_id, task_id], row_to_entry)?;

        let mut entries = Vec::new();
        for e in rows {
            entries.push(e?);
        }
        Ok(entries)
    }

    /// Finds an entry by id.
    ///
    /// # Errors
    /// Returns a `rusqlite` error if query logic fails.
    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<Entry>> {
        let sql = format!("{ENTRY_SELECT} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_entry)
            .optional()
    }

    /// Retrieves the service history of a task, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_history(&self, equipment_id: i64, task_id: i64) -> Result<Vec<Entry>> {
        let mut entries = self.find(equipment_id, task_id)?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    /// Deletes an entry. Returns false if no entry had that id.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn remove(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        equipment_id: row.get(1)?,
        task_id: row.get(2)?,
        name: row.get(3)?,
        date: row.get(4)?,
        usage_hours_at_service: row.get(5)?,
        remarks: row.get(6)?,
    })
}
