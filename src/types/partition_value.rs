use std::fmt::{self, Display};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format of a month boundary inside a CHECK constraint or routing branch.
pub static SQL_DATE_FORMAT: &str = "%Y-%m-%d";
/// Format of a month boundary inside a partition table name.
pub static SUFFIX_MONTH_FORMAT: &str = "%Y-%m";

/// A single value of the partitioning domain.
///
/// Month values are always the first day of their month.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartitionValue {
    Integer(i64),
    Month(NaiveDate),
}

impl PartitionValue {
    /// Renders the value as a SQL literal: bare for integers, single quoted for dates.
    pub fn sql_literal(&self) -> String {
        match self {
            PartitionValue::Integer(value) => value.to_string(),
            PartitionValue::Month(date) => format!("'{}'", date.format(SQL_DATE_FORMAT)),
        }
    }

    /// Renders the table name suffix for a chunk starting at this value.
    pub fn suffix(&self) -> String {
        match self {
            PartitionValue::Integer(value) => format!("_{}", value),
            PartitionValue::Month(date) => format!("_{}", date.format(SUFFIX_MONTH_FORMAT)),
        }
    }
}

impl Display for PartitionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionValue::Integer(value) => write!(f, "{}", value),
            PartitionValue::Month(date) => write!(f, "{}", date.format(SQL_DATE_FORMAT)),
        }
    }
}

impl From<i64> for PartitionValue {
    fn from(value: i64) -> Self {
        PartitionValue::Integer(value)
    }
}

impl From<NaiveDate> for PartitionValue {
    fn from(value: NaiveDate) -> Self {
        PartitionValue::Month(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_rendering() {
        let value = PartitionValue::from(-5i64);
        assert_eq!(value.sql_literal(), "-5");
        assert_eq!(value.suffix(), "_-5");
        assert_eq!(value.to_string(), "-5");
    }

    #[test]
    fn test_month_rendering() {
        let date = NaiveDate::from_ymd_opt(2012, 3, 1).unwrap();
        let value = PartitionValue::from(date);
        assert_eq!(value.sql_literal(), "'2012-03-01'");
        assert_eq!(value.suffix(), "_2012-03");
        assert_eq!(value.to_string(), "2012-03-01");
    }
}
