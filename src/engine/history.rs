//! Entry History: picks the service entry a task's status is measured from.

use super::error::Result;
use super::types::Entry;
use std::cmp::Reverse;

/// Source of logged maintenance events.
///
/// Implementations return entries in any order; selection sorts them.
pub trait EntryHistory: Sync {
    /// Returns every entry logged for the equipment/task pair.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be read.
    fn find(&self, equipment_id: i64, task_id: i64) -> Result<Vec<Entry>>;
}

/// Fetches the most recent entry for a task, or `None` if it was never serviced.
///
/// Always goes back to the store: entries may have been logged or removed
/// since the last call.
///
/// # Errors
/// Propagates lookup failures from `history`.
pub fn latest_entry<H: EntryHistory + ?Sized>(
    history: &H,
    equipment_id: i64,
    task_id: i64,
) -> Result<Option<Entry>> {
    let entries = history.find(equipment_id, task_id)?;
    Ok(select_latest(entries))
}

/// Returns the entry with the greatest date; equal dates fall back to the larger id.
#[must_use]
pub fn select_latest(entries: Vec<Entry>) -> Option<Entry> {
    entries.into_iter().max_by_key(|e| (e.date, e.id))
}

/// Orders entries newest first, using the same tie-break as `select_latest`.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by_key(|e| Reverse((e.date, e.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn make_entry(id: i64, task_id: i64, date: DateTime<Utc>) -> Entry {
        Entry {
            id,
            equipment_id: 1,
            task_id,
            name: format!("entry {id}"),
            date,
            usage_hours_at_service: id * 10,
            remarks: String::new(),
        }
    }

    struct Fixed(Vec<Entry>);

    impl EntryHistory for Fixed {
        fn find(&self, equipment_id: i64, task_id: i64) -> Result<Vec<Entry>> {
            Ok(self
                .0
                .iter()
                .filter(|e| e.equipment_id == equipment_id && e.task_id == task_id)
                .cloned()
                .collect())
        }
    }

    #[test]
    fn test_latest_regardless_of_order() {
        let older = make_entry(1, 1, at(2020, 1, 1));
        let newer = make_entry(2, 1, at(2020, 3, 1));

        let picked = select_latest(vec![older.clone(), newer.clone()]).unwrap();
        assert_eq!(picked.date, at(2020, 3, 1));

        let picked = select_latest(vec![newer, older]).unwrap();
        assert_eq!(picked.date, at(2020, 3, 1));
    }

    #[test]
    fn test_empty_history_is_none() {
        assert!(select_latest(Vec::new()).is_none());
        let history = Fixed(vec![make_entry(1, 2, at(2020, 1, 1))]);
        assert!(latest_entry(&history, 1, 1).unwrap().is_none());
    }

    #[test]
    fn test_same_date_prefers_larger_id() {
        let a = make_entry(4, 1, at(2020, 5, 5));
        let b = make_entry(9, 1, at(2020, 5, 5));
        assert_eq!(select_latest(vec![b.clone(), a.clone()]).unwrap().id, 9);
        assert_eq!(select_latest(vec![a, b]).unwrap().id, 9);
    }

    #[test]
    fn test_latest_entry_filters_by_task() {
        let history = Fixed(vec![
            make_entry(1, 1, at(2020, 1, 1)),
            make_entry(2, 2, at(2021, 1, 1)),
            make_entry(3, 1, at(2020, 6, 1)),
        ]);
        let latest = latest_entry(&history, 1, 1).unwrap().unwrap();
        assert_eq!(latest.id, 3);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut entries = vec![
            make_entry(1, 1, at(2020, 1, 1)),
            make_entry(3, 1, at(2020, 6, 1)),
            make_entry(2, 1, at(2020, 6, 1)),
        ];
        sort_newest_first(&mut entries);
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
