//! Core records for the maintenance tracker.
//!
//! Note: `DueStatus` (the computed urgency) lives in `due.rs`.
//! Nothing here is derived; these are the rows the store persists.

use super::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for `usage_hours_interval` meaning "calendar-only task".
pub const USAGE_TRACKING_DISABLED: i64 = -1;

/// Upper bound for usage intervals and recorded readings (about 114 years of running).
pub const MAX_USAGE_HOURS: i64 = 1_000_000;

/// A recurring maintenance obligation bound to one piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub equipment_id: i64,
    pub name: String,
    pub description: String,
    /// Hours of use between services, or `USAGE_TRACKING_DISABLED`.
    pub usage_hours_interval: i64,
    pub calendar_months_interval: u32,
}

impl Task {
    /// Returns the usage interval, or `None` for calendar-only tasks.
    #[must_use]
    pub fn usage_interval(&self) -> Option<i64> {
        (self.usage_hours_interval != USAGE_TRACKING_DISABLED).then_some(self.usage_hours_interval)
    }

    /// Checks that the recurrence rule can ever come due.
    ///
    /// # Errors
    /// Returns `InvalidRecurrenceRule` if the usage interval is below the
    /// sentinel or above `MAX_USAGE_HOURS`, or if neither interval is positive.
    pub fn validate(&self) -> Result<()> {
        let usage_ok =
            (USAGE_TRACKING_DISABLED..=MAX_USAGE_HOURS).contains(&self.usage_hours_interval);
        let any_set = self.usage_hours_interval > 0 || self.calendar_months_interval > 0;
        if usage_ok && any_set {
            return Ok(());
        }
        Err(EngineError::InvalidRecurrenceRule {
            usage_hours_interval: self.usage_hours_interval,
            calendar_months_interval: self.calendar_months_interval,
        })
    }
}

/// One completed service event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: i64,
    pub equipment_id: i64,
    pub task_id: i64,
    pub name: String,
    pub date: DateTime<Utc>,
    /// Cumulative equipment reading when the service was done.
    pub usage_hours_at_service: i64,
    pub remarks: String,
}

impl Entry {
    /// Checks that the recorded reading is within `0..=MAX_USAGE_HOURS`.
    ///
    /// # Errors
    /// Returns `InvalidUsageReading` otherwise.
    pub fn validate(&self) -> Result<()> {
        if (0..=MAX_USAGE_HOURS).contains(&self.usage_hours_at_service) {
            Ok(())
        } else {
            Err(EngineError::InvalidUsageReading {
                hours: self.usage_hours_at_service,
            })
        }
    }
}

/// A piece of equipment as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub usage_hours: f64,
    pub commission_date: DateTime<Utc>,
}

impl Equipment {
    #[must_use]
    pub fn snapshot(&self) -> EquipmentSnapshot {
        EquipmentSnapshot {
            id: self.id,
            current_usage_hours: self.usage_hours,
            commission_date: self.commission_date,
        }
    }
}

/// Read-only view of equipment state at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquipmentSnapshot {
    pub id: i64,
    pub current_usage_hours: f64,
    /// Baseline date used while a task has no entries yet.
    pub commission_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(usage: i64, months: u32) -> Task {
        Task {
            id: 1,
            equipment_id: 1,
            name: "Oil change".to_string(),
            description: String::new(),
            usage_hours_interval: usage,
            calendar_months_interval: months,
        }
    }

    #[test]
    fn test_usage_interval_sentinel() {
        assert_eq!(make_task(-1, 6).usage_interval(), None);
        assert_eq!(make_task(250, 12).usage_interval(), Some(250));
        assert_eq!(make_task(0, 12).usage_interval(), Some(0));
    }

    #[test]
    fn test_validate_accepts_either_interval() {
        assert!(make_task(250, 0).validate().is_ok());
        assert!(make_task(-1, 6).validate().is_ok());
        assert!(make_task(250, 12).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_rule() {
        assert!(matches!(
            make_task(-1, 0).validate(),
            Err(EngineError::InvalidRecurrenceRule { .. })
        ));
        assert!(make_task(0, 0).validate().is_err());
        assert!(make_task(-5, 12).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_interval() {
        assert!(make_task(MAX_USAGE_HOURS, 0).validate().is_ok());
        assert!(make_task(MAX_USAGE_HOURS + 1, 12).validate().is_err());
        assert!(matches!(
            make_task(i64::MAX, 12).validate(),
            Err(EngineError::InvalidRecurrenceRule { .. })
        ));
    }

    #[test]
    fn test_entry_reading_bounds() {
        let mut entry = Entry {
            id: 1,
            equipment_id: 1,
            task_id: 1,
            name: "Oil change".to_string(),
            date: DateTime::<Utc>::UNIX_EPOCH,
            usage_hours_at_service: 0,
            remarks: String::new(),
        };
        assert!(entry.validate().is_ok());

        entry.usage_hours_at_service = MAX_USAGE_HOURS;
        assert!(entry.validate().is_ok());

        for hours in [-1, MAX_USAGE_HOURS + 1, i64::MAX, i64::MIN] {
            entry.usage_hours_at_service = hours;
            assert!(matches!(
                entry.validate(),
                Err(EngineError::InvalidUsageReading { hours: h }) if h == hours
            ));
        }
    }

    #[test]
    fn test_task_json_is_camel_case() {
        let json = serde_json::to_value(make_task(100, 3)).unwrap();
        assert_eq!(json["usageHoursInterval"], 100);
        assert_eq!(json["calendarMonthsInterval"], 3);
        assert_eq!(json["equipmentId"], 1);
    }
}
