//! Due-Status Engine: Computes how urgently a task needs service.
//!
//! This module answers "is this task on track, coming up, or overdue?" by
//! combining the task's recurrence rule with its latest service entry and the
//! equipment's current reading. Everything here is pure: callers resolve the
//! entry and the snapshot, and pass `now` explicitly.

use super::error::{EngineError, Result};
use super::types::{Entry, EquipmentSnapshot, Task};
use chrono::{DateTime, Months, Utc};
use serde::{Serialize, Serializer};

/// Historical months-to-milliseconds factor for the calendar-near window.
///
/// Kept literally: `months * 30.5 * 24 * 360000.5` ms, roughly a tenth of the
/// interval.
const NEAR_WINDOW_MS_PER_DAY: f64 = 24.0 * 360_000.5;
const DAYS_PER_MONTH: f64 = 30.5;

/// Three-valued urgency, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    OnTrack,
    Approaching,
    Overdue,
}

impl Level {
    /// Numeric code used in serialized output (1, 2, 3).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Level::OnTrack => 1,
            Level::Approaching => 2,
            Level::Overdue => 3,
        }
    }

    /// Returns the display color hint for UI rendering.
    #[must_use]
    pub fn color_hint(self) -> &'static str {
        match self {
            Level::OnTrack => "green",
            Level::Approaching => "amber",
            Level::Overdue => "red",
        }
    }

    /// Returns true if the task needs attention now or soon.
    #[must_use]
    pub fn needs_attention(self) -> bool {
        matches!(self, Level::Approaching | Level::Overdue)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::OnTrack => write!(f, "ON TRACK"),
            Level::Approaching => write!(f, "APPROACHING"),
            Level::Overdue => write!(f, "OVERDUE"),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// The derived due status of a task. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DueStatus {
    pub level: Level,
    #[serde(rename = "nextDueDate")]
    pub next_due_date: DateTime<Utc>,
    /// Negative when overdue by usage; always 0 for calendar-only tasks.
    #[serde(rename = "engineHoursLeft")]
    pub usage_hours_remaining: i64,
}

/// Derives the due status of a task from its latest entry and equipment.
///
/// This is a pure function - no I/O, no clock, no hidden state. With no
/// entry the baseline is zero hours at the equipment's commission date.
///
/// # Errors
/// Returns `DateOutOfRange` if adding the calendar interval overflows, or
/// `UsageOverflow` if the remaining hours do not fit in an `i64`.
pub fn compute_status(
    task: &Task,
    entry: Option<&Entry>,
    equipment: &EquipmentSnapshot,
    now: DateTime<Utc>,
) -> Result<DueStatus> {
    debug_assert!(task.validate().is_ok(), "unvalidated task {}", task.id);

    let last_usage_hours = entry.map_or(0, |e| e.usage_hours_at_service);
    let last_service_date = entry.map_or(equipment.commission_date, |e| e.date);

    let usage_hours_remaining = match task.usage_interval() {
        Some(interval) => interval
            .checked_add(last_usage_hours)
            .and_then(|due_at| due_at.checked_sub(round_up_hours(equipment.current_usage_hours)))
            .ok_or(EngineError::UsageOverflow { task_id: task.id })?,
        None => 0,
    };

    let next_due_date = add_months(last_service_date, task.calendar_months_interval)?;
    let calendar_near = is_calendar_near(next_due_date, now, task.calendar_months_interval);
    let due_by_date = next_due_date <= now;

    let level = match task.usage_interval() {
        Some(interval) => {
            if usage_hours_remaining <= 0 || due_by_date {
                Level::Overdue
            } else if usage_hours_remaining < approaching_margin(interval) || calendar_near {
                Level::Approaching
            } else {
                Level::OnTrack
            }
        }
        None => {
            if due_by_date {
                Level::Overdue
            } else if calendar_near {
                Level::Approaching
            } else {
                Level::OnTrack
            }
        }
    };

    Ok(DueStatus {
        level,
        next_due_date,
        usage_hours_remaining,
    })
}

/// Advances `date` by whole calendar months, clamping to the month's end.
///
/// # Errors
/// Returns `DateOutOfRange` on overflow.
pub fn add_months(date: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
    date.checked_add_months(Months::new(months))
        .ok_or(EngineError::DateOutOfRange)
}

/// Hours left below which a usage-tracked task counts as approaching.
#[must_use]
pub fn approaching_margin(usage_hours_interval: i64) -> i64 {
    let tenth = usage_hours_interval / 10;
    if usage_hours_interval % 10 > 0 {
        tenth + 1
    } else {
        tenth
    }
}

/// Width of the calendar-near window in milliseconds.
#[must_use]
pub fn calendar_near_window_ms(calendar_months_interval: u32) -> f64 {
    f64::from(calendar_months_interval) * DAYS_PER_MONTH * NEAR_WINDOW_MS_PER_DAY
}

fn is_calendar_near(next_due_date: DateTime<Utc>, now: DateTime<Utc>, months: u32) -> bool {
    let distance_ms = (next_due_date - now).num_milliseconds().unsigned_abs() as f64;
    distance_ms <= calendar_near_window_ms(months)
}

/// Rounds a fractional reading up to the next whole hour.
///
/// Saturates at the `i64` bounds; NaN maps to 0.
#[allow(clippy::cast_possible_truncation)]
fn round_up_hours(hours: f64) -> i64 {
    hours.ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::MAX_USAGE_HOURS;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn make_task(usage: i64, months: u32) -> Task {
        Task {
            id: 1,
            equipment_id: 1,
            name: "Impeller".to_string(),
            description: String::new(),
            usage_hours_interval: usage,
            calendar_months_interval: months,
        }
    }

    fn make_entry(date: DateTime<Utc>, hours: i64) -> Entry {
        Entry {
            id: 1,
            equipment_id: 1,
            task_id: 1,
            name: "Impeller".to_string(),
            date,
            usage_hours_at_service: hours,
            remarks: String::new(),
        }
    }

    fn make_equipment(hours: f64) -> EquipmentSnapshot {
        EquipmentSnapshot {
            id: 1,
            current_usage_hours: hours,
            commission_date: at(2020, 1, 1),
        }
    }

    #[test]
    fn test_fresh_equipment_on_track() {
        let task = make_task(250, 12);
        let status = compute_status(&task, None, &make_equipment(0.0), at(2020, 1, 1)).unwrap();
        assert_eq!(status.usage_hours_remaining, 250);
        assert_eq!(status.next_due_date, at(2021, 1, 1));
        assert_eq!(status.level, Level::OnTrack);
    }

    #[test]
    fn test_approaching_by_usage() {
        let task = make_task(250, 12);
        let status = compute_status(&task, None, &make_equipment(240.0), at(2020, 1, 1)).unwrap();
        assert_eq!(status.usage_hours_remaining, 10);
        assert_eq!(status.level, Level::Approaching);
    }

    #[test]
    fn test_overdue_by_usage() {
        let task = make_task(250, 12);
        let status = compute_status(&task, None, &make_equipment(251.0), at(2020, 1, 1)).unwrap();
        assert_eq!(status.usage_hours_remaining, -1);
        assert_eq!(status.level, Level::Overdue);
    }

    #[test]
    fn test_exactly_zero_remaining_is_overdue() {
        let task = make_task(250, 12);
        let status = compute_status(&task, None, &make_equipment(250.0), at(2020, 1, 1)).unwrap();
        assert_eq!(status.usage_hours_remaining, 0);
        assert_eq!(status.level, Level::Overdue);
    }

    #[test]
    fn test_fractional_reading_rounds_up() {
        let task = make_task(250, 12);
        let status = compute_status(&task, None, &make_equipment(100.2), at(2020, 1, 1)).unwrap();
        assert_eq!(status.usage_hours_remaining, 149);
    }

    #[test]
    fn test_calendar_only_overdue_after_entry() {
        let task = make_task(-1, 6);
        let entry = make_entry(at(2020, 1, 1), 0);
        let status =
            compute_status(&task, Some(&entry), &make_equipment(900.0), at(2020, 7, 2)).unwrap();
        assert_eq!(status.next_due_date, at(2020, 7, 1));
        assert_eq!(status.usage_hours_remaining, 0);
        assert_eq!(status.level, Level::Overdue);
    }

    #[test]
    fn test_calendar_only_ignores_usage() {
        let task = make_task(-1, 6);
        let low = compute_status(&task, None, &make_equipment(0.0), at(2020, 2, 1)).unwrap();
        let high = compute_status(&task, None, &make_equipment(1e6), at(2020, 2, 1)).unwrap();
        assert_eq!(low, high);
        assert_eq!(low.level, Level::OnTrack);
    }

    #[test]
    fn test_entry_resets_baseline() {
        let task = make_task(100, 12);
        let entry = make_entry(at(2020, 6, 1), 300);
        let status =
            compute_status(&task, Some(&entry), &make_equipment(350.0), at(2020, 6, 2)).unwrap();
        assert_eq!(status.usage_hours_remaining, 50);
        assert_eq!(status.next_due_date, at(2021, 6, 1));
        assert_eq!(status.level, Level::OnTrack);
    }

    #[test]
    fn test_calendar_near_window_approaching() {
        // 12 months -> window of ~36.6 days before (or after) the due date.
        let task = make_task(-1, 12);
        let inside = compute_status(&task, None, &make_equipment(0.0), at(2020, 12, 1)).unwrap();
        assert_eq!(inside.level, Level::Approaching);

        let outside = compute_status(&task, None, &make_equipment(0.0), at(2020, 11, 20)).unwrap();
        assert_eq!(outside.level, Level::OnTrack);
    }

    #[test]
    fn test_calendar_near_escalates_usage_task() {
        let task = make_task(250, 12);
        let status = compute_status(&task, None, &make_equipment(10.0), at(2020, 12, 15)).unwrap();
        assert_eq!(status.level, Level::Approaching);
    }

    #[test]
    fn test_due_date_equal_to_now_is_overdue() {
        let task = make_task(-1, 1);
        let status = compute_status(&task, None, &make_equipment(0.0), at(2020, 2, 1)).unwrap();
        assert_eq!(status.level, Level::Overdue);
    }

    #[test]
    fn test_month_end_clamps() {
        assert_eq!(add_months(at(2020, 1, 31), 1).unwrap(), at(2020, 2, 29));
        assert_eq!(add_months(at(2021, 1, 31), 1).unwrap(), at(2021, 2, 28));
        assert_eq!(add_months(at(2020, 8, 31), 6).unwrap(), at(2021, 2, 28));
        assert_eq!(add_months(at(2020, 3, 15), 0).unwrap(), at(2020, 3, 15));
    }

    #[test]
    fn test_approaching_margin_rounds_up() {
        assert_eq!(approaching_margin(250), 25);
        assert_eq!(approaching_margin(251), 26);
        assert_eq!(approaching_margin(5), 1);
        assert_eq!(approaching_margin(0), 0);
        assert_eq!(approaching_margin(i64::MAX), i64::MAX / 10 + 1);
    }

    #[test]
    fn test_huge_entry_reading_is_an_error() {
        let task = make_task(250, 12);
        let entry = make_entry(at(2020, 6, 1), i64::MAX);
        let result = compute_status(&task, Some(&entry), &make_equipment(0.0), at(2020, 6, 2));
        assert!(matches!(result, Err(EngineError::UsageOverflow { task_id: 1 })));
    }

    #[test]
    fn test_huge_current_reading_is_an_error() {
        let task = make_task(250, 12);
        let entry = make_entry(at(2020, 6, 1), -1_000);
        let huge = make_equipment(f64::MAX);
        let result = compute_status(&task, Some(&entry), &huge, at(2020, 6, 2));
        assert!(matches!(result, Err(EngineError::UsageOverflow { .. })));
    }

    #[test]
    fn test_largest_valid_interval_computes() {
        let task = make_task(MAX_USAGE_HOURS, 12);
        let entry = make_entry(at(2020, 6, 1), MAX_USAGE_HOURS);
        let status =
            compute_status(&task, Some(&entry), &make_equipment(1e6), at(2020, 6, 2)).unwrap();
        assert_eq!(status.usage_hours_remaining, MAX_USAGE_HOURS);
        assert_eq!(status.level, Level::OnTrack);
    }

    #[test]
    fn test_near_window_constant() {
        let expected = 12.0 * 30.5 * 24.0 * 360_000.5;
        assert!((calendar_near_window_ms(12) - expected).abs() < f64::EPSILON);
        assert!(calendar_near_window_ms(0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_level_ordering_and_codes() {
        assert!(Level::OnTrack < Level::Approaching);
        assert!(Level::Approaching < Level::Overdue);
        assert_eq!(Level::OnTrack.code(), 1);
        assert_eq!(Level::Overdue.code(), 3);
        assert!(!Level::OnTrack.needs_attention());
        assert!(Level::Approaching.needs_attention());
    }

    #[test]
    fn test_status_json_shape() {
        let task = make_task(250, 12);
        let status = compute_status(&task, None, &make_equipment(240.0), at(2020, 1, 1)).unwrap();
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["level"], 2);
        assert_eq!(json["engineHoursLeft"], 10);
        assert_eq!(json["nextDueDate"], "2021-01-01T00:00:00Z");
    }
}
