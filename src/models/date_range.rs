use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// An inclusive calendar-date range for statement filtering.
///
/// The textual form is exactly two ISO dates joined by `" - "`, e.g.
/// `"2024-01-01 - 2024-01-31"`. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(AppError::Validation(format!(
                "End date {} precedes start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl FromStr for DateRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(" - ").collect();
        if parts.len() != 2 {
            return Err(AppError::Validation(format!(
                "Invalid date range '{}': expected 'YYYY-MM-DD - YYYY-MM-DD'",
                s
            )));
        }

        let mut dates = parts.iter().map(|part| {
            NaiveDate::parse_from_str(part.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", part))
            })
        });

        let start = dates.next().unwrap()?;
        let end = dates.next().unwrap()?;
        Self::new(start, end)
    }
}
