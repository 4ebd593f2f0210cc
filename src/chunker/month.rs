use chrono::{Datelike, Months, NaiveDate};
use log::debug;

use crate::error::{PartitionError, Result};
use crate::utils::{parse_month, DEFAULT_MONTH_FORMAT};
use crate::{Chunk, PartitionValue};

use super::Chunker;

/// Chunks a calendar domain into partitions of `stride` months.
///
/// Both bounds are months. Boundaries are `start, start + stride, ...` up to and
/// including the `end` month, and each consecutive pair of boundaries is a chunk, so
/// the last chunk ends on the first of the `end` month. A trailing remainder shorter
/// than `stride` gets no chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthChunker {
    start: NaiveDate,
    end: NaiveDate,
    stride: u32,
}

impl MonthChunker {
    /// Parses `start` and `end` with the chrono format `fmt`, for example `"%Y-%m"`.
    pub fn new(start: &str, end: &str, fmt: &str) -> Result<Self> {
        Self::with_stride(start, end, 1, fmt)
    }

    pub fn with_stride(start: &str, end: &str, stride: u32, fmt: &str) -> Result<Self> {
        let start = parse_month(start, fmt)?;
        let end = parse_month(end, fmt)?;
        Self::from_dates(start, end, stride)
    }

    /// Builds a chunker from dates; days are ignored.
    pub fn from_dates(start: NaiveDate, end: NaiveDate, stride: u32) -> Result<Self> {
        if stride == 0 {
            return Err(PartitionError::Domain(
                "Stride must be at least one month".to_string(),
            ));
        }
        let start = first_of_month(start)?;
        let end = first_of_month(end)?;
        if end < start {
            return Err(PartitionError::Domain(format!(
                "End {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end, stride })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn iter(&self) -> MonthChunks {
        MonthChunks {
            current: self.start,
            end: self.end,
            stride: Months::new(self.stride),
        }
    }
}

impl TryFrom<(&str, &str)> for MonthChunker {
    type Error = PartitionError;

    fn try_from(value: (&str, &str)) -> Result<Self> {
        MonthChunker::new(value.0, value.1, DEFAULT_MONTH_FORMAT)
    }
}

impl Chunker for MonthChunker {
    fn chunks(&self) -> Result<Box<dyn Iterator<Item = Chunk> + '_>> {
        debug!(
            "chunking months [{}, {}] by {}",
            self.start, self.end, self.stride
        );
        Ok(Box::new(self.iter()))
    }
}

fn first_of_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .ok_or_else(|| PartitionError::Domain(format!("{} has no first day", date)))
}

/// Iterator over the chunks of a [`MonthChunker`].
#[derive(Debug, Clone)]
pub struct MonthChunks {
    current: NaiveDate,
    end: NaiveDate,
    stride: Months,
}

impl Iterator for MonthChunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let next = self
            .current
            .checked_add_months(self.stride)
            .filter(|next| *next <= self.end)?;
        let chunk = Chunk::new(PartitionValue::Month(self.current), PartitionValue::Month(next));
        self.current = next;
        Some(chunk)
    }
}
