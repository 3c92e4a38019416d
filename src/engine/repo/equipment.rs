//! Equipment Repository: Usage counters and commission dates.

use crate::engine::types::Equipment;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

const EQUIPMENT_SELECT: &str = "SELECT id, name, usage_hours, commissioned_at FROM equipment";

pub struct EquipmentRepo<'a> {
    conn: &'a Connection,
}

impl<'a> EquipmentRepo<'a> {
    #[must_use]
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Registers a piece of equipment.
    ///
    /// # Errors
    /// Returns an error if the reading is negative or the insertion fails.
    pub fn add(
        &self,
        name: &str,
        usage_hours: f64,
        commission_date: DateTime<Utc>,
    ) -> Result<i64> {
        if !usage_hours.is_finite() || usage_hours < 0.0 {
            bail!("Usage hours must be a non-negative number, got {usage_hours}");
        }
        self.conn.execute(
            "INSERT INTO equipment (name, usage_hours, commissioned_at) VALUES (?1, ?2, ?3)",
            params![name, usage_hours, commission_date],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Retrieves all equipment, ordered by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn get_all(&self) -> Result<Vec<Equipment>> {
        let sql = format!("{EQUIPMENT_SELECT} ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_equipment)?;
        let mut equipment = Vec::new();
        for e in rows {
            equipment.push(e?);
        }
        Ok(equipment)
    }

    /// Finds equipment by id.
    ///
    /// # Errors
    /// Returns a `rusqlite` error if query logic fails.
    pub fn find_by_id(&self, id: i64) -> rusqlite::Result<Option<Equipment>> {
        let sql = format!("{EQUIPMENT_SELECT} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_equipment)
            .optional()
    }

    /// Records a new usage reading.
    ///
    /// The counter only moves forward; a lower reading is rejected.
    ///
    /// # Errors
    /// Returns an error if the equipment is unknown, the reading goes
    /// backwards, or the update fails.
    pub fn update_usage_hours(&self, id: i64, usage_hours: f64) -> Result<()> {
        let current = self
            .find_by_id(id)
            .context("Equipment lookup failed")?
            .with_context(|| format!("Equipment not found: {id}"))?;

        if !usage_hours.is_finite() || usage_hours < current.usage_hours {
            bail!(
                "Usage hours for [{}] cannot go from {} to {usage_hours}",
                current.name,
                current.usage_hours
            );
        }

        self.conn.execute(
            "UPDATE equipment SET usage_hours = ?1 WHERE id = ?2",
            params![usage_hours, id],
        )?;
        debug!(
            equipment_id = id,
            from = current.usage_hours,
            to = usage_hours,
            "Updated usage hours"
        );
        Ok(())
    }
}

fn row_to_equipment(row: &rusqlite::Row) -> rusqlite::Result<Equipment> {
    Ok(Equipment {
        id: row.get(0)?,
        name: row.get(1)?,
        usage_hours: row.get(2)?,
        commission_date: row.get(3)?,
    })
}
