//! Date windows used by policy validity and history lookback
//!
//! Policy validity is expressed in calendar days and both ends are
//! inclusive: a policy running 2024-01-01..=2024-12-31 covers an incident at
//! 23:59 on the 31st. Lookback windows are measured between two instants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Returns true if `date` falls within the range, both ends included
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if the UTC calendar date of `instant` falls within the range
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.contains(instant.date_naive())
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Returns true if `earlier` happened no more than `days` days before `later`
///
/// An `earlier` that is actually after `later` is never within the lookback.
pub fn within_lookback(earlier: DateTime<Utc>, later: DateTime<Utc>, days: u32) -> bool {
    if earlier > later {
        return false;
    }
    later - earlier <= chrono::Duration::days(i64::from(days))
}
