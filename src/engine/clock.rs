//! Time source and date parsing.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

/// Supplies the evaluation instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
///
/// # Errors
/// Returns an error if the input matches neither format.
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).context("Date has no midnight")?;
        return Ok(midnight.and_utc());
    }
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid date '{input}', expected YYYY-MM-DD or RFC 3339"))
}
