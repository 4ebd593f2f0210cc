use log::debug;

use crate::error::{PartitionError, Result};
use crate::{Chunk, PartitionValue};

use super::Chunker;

/// Chunks an integer domain into partitions that are exactly `stride` wide.
///
/// Walks `start, start + stride, ...` while the value is below `end`. When
/// `end - start` is not a multiple of `stride` the last chunk still has the full
/// width and ends past `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntChunker {
    start: i64,
    end: i64,
    stride: i64,
}

impl IntChunker {
    pub fn new(start: i64, end: i64, stride: i64) -> Result<Self> {
        if stride <= 0 {
            return Err(PartitionError::Domain(format!(
                "Stride must be positive, got {}",
                stride
            )));
        }
        if end < start {
            return Err(PartitionError::Domain(format!(
                "End {} is before start {}",
                end, start
            )));
        }
        // The upper bound of the last chunk must still be representable.
        let span = end as i128 - start as i128;
        let count = (span + stride as i128 - 1) / stride as i128;
        let last_end = start as i128 + count * stride as i128;
        if last_end > i64::MAX as i128 {
            return Err(PartitionError::Domain(format!(
                "Chunks of {} from {} to {} overflow a 64-bit integer",
                stride, start, end
            )));
        }
        Ok(Self { start, end, stride })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn stride(&self) -> i64 {
        self.stride
    }

    pub fn iter(&self) -> IntChunks {
        IntChunks {
            next: Some(self.start),
            end: self.end,
            stride: self.stride,
        }
    }
}

impl Chunker for IntChunker {
    fn chunks(&self) -> Result<Box<dyn Iterator<Item = Chunk> + '_>> {
        debug!(
            "chunking integers [{}, {}) by {}",
            self.start, self.end, self.stride
        );
        Ok(Box::new(self.iter()))
    }
}

/// Iterator over the chunks of an [`IntChunker`].
#[derive(Debug, Clone)]
pub struct IntChunks {
    next: Option<i64>,
    end: i64,
    stride: i64,
}

impl Iterator for IntChunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let start = self.next.filter(|start| *start < self.end)?;
        let end = start.checked_add(self.stride)?;
        self.next = Some(end);
        Some(Chunk::new(PartitionValue::Integer(start), PartitionValue::Integer(end)))
    }
}
