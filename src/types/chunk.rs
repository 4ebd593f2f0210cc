use serde::{Deserialize, Serialize};

use super::PartitionValue;

/// One half-open sub-range `[start, end)` of the partitioning domain, mapped to
/// one partition table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    start: PartitionValue,
    end: PartitionValue,
    suffix: String,
    sql_start: String,
    sql_end: String,
}

impl Chunk {
    /// Builds a chunk, deriving the suffix from `start` and the SQL literals from both bounds.
    pub fn new(start: PartitionValue, end: PartitionValue) -> Self {
        Self {
            suffix: start.suffix(),
            sql_start: start.sql_literal(),
            sql_end: end.sql_literal(),
            start,
            end,
        }
    }

    pub fn start(&self) -> &PartitionValue {
        &self.start
    }

    pub fn end(&self) -> &PartitionValue {
        &self.end
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn sql_start(&self) -> &str {
        &self.sql_start
    }

    pub fn sql_end(&self) -> &str {
        &self.sql_end
    }

    /// Name of the partition table holding this chunk.
    pub fn table_name(&self, master_table: &str) -> String {
        format!("{}{}", master_table, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_integer_chunk() {
        let chunk = Chunk::new(PartitionValue::Integer(4), PartitionValue::Integer(7));
        assert_eq!(chunk.suffix(), "_4");
        assert_eq!(chunk.sql_start(), "4");
        assert_eq!(chunk.sql_end(), "7");
        assert_eq!(chunk.table_name("test_part"), "test_part_4");
    }

    #[test]
    fn test_month_chunk() {
        let start = NaiveDate::from_ymd_opt(2012, 12, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2013, 1, 1).unwrap();
        let chunk = Chunk::new(start.into(), end.into());
        assert_eq!(chunk.table_name("test_month"), "test_month_2012-12");
        assert_eq!(chunk.sql_start(), "'2012-12-01'");
        assert_eq!(chunk.sql_end(), "'2013-01-01'");
    }

    #[test]
    fn test_chunk_serializes_to_ron() {
        let chunk = Chunk::new(PartitionValue::Integer(0), PartitionValue::Integer(1));
        let serialized = ron::to_string(&chunk).unwrap();
        let restored: Chunk = ron::from_str(&serialized).unwrap();
        assert_eq!(restored, chunk);
        assert!(serialized.contains("\"_0\""));
    }
}
