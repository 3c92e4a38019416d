//! Error types for the due-status engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A record referenced by id could not be resolved.
    #[error("{kind} not found: {id}")]
    ReferenceNotFound { kind: &'static str, id: i64 },

    #[error(
        "Invalid recurrence rule: usage interval {usage_hours_interval}, \
         calendar interval {calendar_months_interval} months"
    )]
    InvalidRecurrenceRule {
        usage_hours_interval: i64,
        calendar_months_interval: u32,
    },

    /// A usage reading is negative or above `MAX_USAGE_HOURS`.
    #[error("Usage reading out of range: {hours} h")]
    InvalidUsageReading { hours: i64 },

    #[error("Due date is outside the representable range")]
    DateOutOfRange,

    #[error("Remaining hours overflow for task {task_id}")]
    UsageOverflow { task_id: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Lookup failed: {0}")]
    Lookup(String),
}

impl EngineError {
    #[must_use]
    pub fn equipment_not_found(id: i64) -> Self {
        Self::ReferenceNotFound {
            kind: "Equipment",
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_not_found_message() {
        let err = EngineError::equipment_not_found(7);
        assert_eq!(err.to_string(), "Equipment not found: 7");
    }

    #[test]
    fn test_storage_from_rusqlite() {
        let err: EngineError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, EngineError::Storage(_)));
    }

    #[test]
    fn test_invalid_usage_reading_message() {
        let err = EngineError::InvalidUsageReading { hours: -3 };
        assert_eq!(err.to_string(), "Usage reading out of range: -3 h");
    }
}
