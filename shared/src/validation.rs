//! Validation utilities for the Stock Tracker
//!
//! Query-parameter checks for the report endpoints plus the basic account
//! rules. Struct-level rules live on the input types via `validator`.

use chrono::NaiveDate;

use crate::types::DateRange;

pub const MIN_REPORT_YEAR: i32 = 2020;
pub const MAX_REPORT_YEAR: i32 = 2030;
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;
pub const MAX_HISTORY_LIMIT: u32 = 1000;

// ============================================================================
// Report Query Validations
// ============================================================================

/// Validate month is 1..=12
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err("Month must be between 1 and 12")
    }
}

/// Validate report year is within the supported range
pub fn validate_year(year: i32) -> Result<(), &'static str> {
    if (MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
        Ok(())
    } else {
        Err("Year must be between 2020 and 2030")
    }
}

/// Validate item history limit, falling back to the default when absent
pub fn validate_history_limit(limit: Option<u32>) -> Result<u32, &'static str> {
    match limit {
        None => Ok(DEFAULT_HISTORY_LIMIT),
        Some(l) if (1..=MAX_HISTORY_LIMIT).contains(&l) => Ok(l),
        Some(_) => Err("Limit must be between 1 and 1000"),
    }
}

/// Validate that a date range is not inverted
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), &'static str> {
    if DateRange::new(start, end).is_inverted() {
        Err("Start date must be before end date")
    } else {
        Ok(())
    }
}
