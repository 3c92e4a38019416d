//! In-memory record store for embedding and tests.

use super::error::Result;
use super::history::EntryHistory;
use super::snapshot::EquipmentSource;
use super::types::{Entry, EquipmentSnapshot};
use std::collections::HashMap;

/// Holds entries and equipment snapshots in plain collections.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Vec<Entry>,
    equipment: HashMap<i64, EquipmentSnapshot>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Removes an entry by id. Returns true if one was removed.
    pub fn remove_entry(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn put_equipment(&mut self, snapshot: EquipmentSnapshot) {
        self.equipment.insert(snapshot.id, snapshot);
    }
}

impl EntryHistory for MemoryStore {
    fn find(&self, equipment_id: i64, task_id: i64) -> Result<Vec<Entry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.equipment_id == equipment_id && e.task_id == task_id)
            .cloned()
            .collect())
    }
}

impl EquipmentSource for MemoryStore {
    fn get_by_id(&self, equipment_id: i64) -> Result<Option<EquipmentSnapshot>> {
        Ok(self.equipment.get(&equipment_id).copied())
    }
}
