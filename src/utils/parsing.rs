use chrono::{Datelike, NaiveDate};

use crate::error::{PartitionError, Result};

/// Default format of the month bounds accepted by the calendar chunker.
pub static DEFAULT_MONTH_FORMAT: &str = "%Y-%m";

/// Parses an integer domain bound.
pub fn parse_integer(value: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|err| {
        PartitionError::Domain(format!("Could not parse '{}' as an integer. {}", value, err))
    })
}

/// Parses `value` with the chrono format `fmt` and returns the first day of its month.
///
/// Formats without a day field, such as the default `%Y-%m`, cannot be turned into a
/// date on their own, so a synthetic day is appended before parsing again.
pub fn parse_month(value: &str, fmt: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let date = match NaiveDate::parse_from_str(value, fmt) {
        Ok(date) => date,
        Err(err) => NaiveDate::parse_from_str(&format!("{} 1", value), &format!("{} %d", fmt))
            .map_err(|_| {
                PartitionError::Format(format!(
                    "Could not parse '{}' with format '{}'. {}",
                    value, fmt, err
                ))
            })?,
    };
    date.with_day(1).ok_or_else(|| {
        PartitionError::Format(format!("Could not move '{}' to the first of its month", value))
    })
}
