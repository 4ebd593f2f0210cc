use crate::chunker::{Chunker, IntChunker, MonthChunker};
use crate::error::Result;
use crate::utils::validate_identifier;
use crate::IndexColumns;

pub use self::{
    artifact::{Artifact, Render},
    operations::{
        ArbitrarySql, CreateTables, DropTables, Indexes, Partitioned, RoutingFunction,
        RoutingTrigger,
    },
};

mod artifact;
pub mod operations;

/// Binds a [`Chunker`] to a master table and its partitioning column.
#[derive(Debug, Clone)]
pub struct RangePartitioner<C> {
    chunker: C,
    master_table: String,
    column: String,
    index_columns: IndexColumns,
}

pub type MonthPartitioner = RangePartitioner<MonthChunker>;
pub type IntPartitioner = RangePartitioner<IntChunker>;

impl<C: Chunker> RangePartitioner<C> {
    /// Indexes default to a single group holding the partitioning column.
    pub fn new(chunker: C, master_table: &str, column: &str) -> Result<Self> {
        validate_identifier(master_table)?;
        validate_identifier(column)?;
        Ok(Self {
            chunker,
            index_columns: IndexColumns::for_column(column),
            master_table: master_table.to_string(),
            column: column.to_string(),
        })
    }

    /// Replaces the index column groups. Group positions become part of the index names.
    ///
    /// An empty list keeps the default index on the partitioning column.
    pub fn with_index_columns(mut self, index_columns: IndexColumns) -> Result<Self> {
        index_columns.validate()?;
        self.index_columns = if index_columns.groups().is_empty() {
            IndexColumns::for_column(&self.column)
        } else {
            index_columns
        };
        Ok(self)
    }
}

impl MonthPartitioner {
    /// Monthly partitions from `start` to `end`, both parsed with the chrono format `fmt`.
    pub fn monthly(
        master_table: &str,
        column: &str,
        start: &str,
        end: &str,
        fmt: &str,
    ) -> Result<Self> {
        Self::new(MonthChunker::new(start, end, fmt)?, master_table, column)
    }
}

impl IntPartitioner {
    pub fn integer(
        master_table: &str,
        column: &str,
        start: i64,
        end: i64,
        stride: i64,
    ) -> Result<Self> {
        Self::new(IntChunker::new(start, end, stride)?, master_table, column)
    }
}

impl<C: Chunker> Partitioned for RangePartitioner<C> {
    type Source = C;

    fn chunker(&self) -> &C {
        &self.chunker
    }
    fn master_table(&self) -> &str {
        &self.master_table
    }
    fn column(&self) -> &str {
        &self.column
    }
    fn index_columns(&self) -> &IndexColumns {
        &self.index_columns
    }
}

impl<C: Chunker> CreateTables for RangePartitioner<C> {}
impl<C: Chunker> DropTables for RangePartitioner<C> {}
impl<C: Chunker> RoutingFunction for RangePartitioner<C> {}
impl<C: Chunker> RoutingTrigger for RangePartitioner<C> {}
impl<C: Chunker> Indexes for RangePartitioner<C> {}
impl<C: Chunker> ArbitrarySql for RangePartitioner<C> {}
impl<C: Chunker> Render for RangePartitioner<C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PartitionError;
    use crate::IndexGroup;

    fn int_partitioner(start: i64, end: i64, stride: i64) -> IntPartitioner {
        IntPartitioner::integer("t", "c", start, end, stride).unwrap()
    }

    #[test]
    fn test_create_ddl_grammar() {
        let expected = "CREATE TABLE t_0 (\n    CHECK ( c >= 0 AND c < 1 )\n) INHERITS (t);\n\
                        CREATE TABLE t_1 (\n    CHECK ( c >= 1 AND c < 2 )\n) INHERITS (t);";
        assert_eq!(int_partitioner(0, 2, 1).create_ddl().unwrap(), expected);
    }

    #[test]
    fn test_empty_domain_renders_nothing() {
        let partitioner = int_partitioner(3, 3, 1);
        assert_eq!(partitioner.create_ddl().unwrap(), "");
        assert_eq!(partitioner.drop_ddl().unwrap(), "");
        assert_eq!(partitioner.function_code().unwrap(), "");
        assert_eq!(partitioner.create_index_ddl().unwrap(), "");
        assert_eq!(partitioner.drop_index_ddl().unwrap(), "");
        assert_eq!(partitioner.sql("VACUUM {table};").unwrap(), "");
        assert_eq!(
            partitioner.drop_trigger_code().unwrap(),
            "DROP TRIGGER insert_t_trigger ON t;"
        );
        assert!(partitioner.trigger_code().unwrap().starts_with("CREATE TRIGGER insert_t_trigger"));
    }

    #[test]
    fn test_branch_exhaustiveness() {
        for count in 1..6 {
            let function = int_partitioner(0, count, 1).function_code().unwrap();
            let lines: Vec<&str> = function.lines().map(str::trim_start).collect();
            let ifs = lines.iter().filter(|line| line.starts_with("IF (")).count();
            let elsifs = lines.iter().filter(|line| line.starts_with("ELSIF (")).count();
            let elses = lines.iter().filter(|line| **line == "ELSE").count();
            let raises = lines.iter().filter(|line| line.starts_with("RAISE EXCEPTION")).count();
            assert_eq!((ifs, elsifs, elses, raises), (1, count as usize - 1, 1, 1));
        }
    }

    #[test]
    fn test_index_names_match_between_create_and_drop() {
        let partitioner = int_partitioner(0, 3, 1)
            .with_index_columns(IndexColumns(vec![
                IndexGroup(vec!["c".to_string()]),
                "a, b".parse().unwrap(),
            ]))
            .unwrap();
        let created: Vec<String> = partitioner
            .create_index_ddl()
            .unwrap()
            .lines()
            .map(|line| line.split_whitespace().nth(2).unwrap().to_string())
            .collect();
        let dropped: Vec<String> = partitioner
            .drop_index_ddl()
            .unwrap()
            .lines()
            .map(|line| line.trim_start_matches("DROP INDEX ").trim_end_matches(';').to_string())
            .collect();
        assert_eq!(created.len(), 6);
        assert_eq!(created, dropped);
        assert_eq!(created[1], "t_0_1_index");
        assert!(partitioner
            .create_index_ddl()
            .unwrap()
            .contains("CREATE INDEX t_2_1_index ON t_2 (a,b);"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let partitioner = MonthPartitioner::monthly("m", "d", "2012-11", "2013-02", "%Y-%m").unwrap();
        for artifact in [
            Artifact::CreateDdl,
            Artifact::DropDdl,
            Artifact::Function,
            Artifact::Trigger,
            Artifact::DropTrigger,
            Artifact::CreateIndexDdl,
            Artifact::DropIndexDdl,
            Artifact::Sql("ANALYZE {table_name};".to_string()),
        ] {
            assert_eq!(
                partitioner.render(&artifact).unwrap(),
                partitioner.render(&artifact).unwrap(),
                "{}",
                artifact
            );
        }
    }

    #[test]
    fn test_sql_with_frame() {
        let sql = int_partitioner(0, 2, 1)
            .sql_with(
                "    SELECT count(*) FROM {table_name}",
                Some("-- partitions of {master_table_name} by {column}"),
                Some("-- end"),
            )
            .unwrap();
        assert_eq!(
            sql,
            "-- partitions of t by c\n    SELECT count(*) FROM t_0\n    SELECT count(*) FROM t_1\n-- end"
        );
    }

    #[test]
    fn test_template_errors() {
        let partitioner = int_partitioner(0, 2, 1);
        assert!(matches!(
            partitioner.sql("VACUUM {tbl};"),
            Err(PartitionError::Template(_))
        ));
        assert!(matches!(
            partitioner.sql_with("VACUUM {table};", Some("{start}"), None),
            Err(PartitionError::Template(_))
        ));
    }

    #[test]
    fn test_rejects_bad_names() {
        assert!(matches!(
            IntPartitioner::integer("t; DROP TABLE t", "c", 0, 1, 1),
            Err(PartitionError::Identifier(_))
        ));
        assert!(matches!(
            int_partitioner(0, 1, 1)
                .with_index_columns(IndexColumns(vec![IndexGroup(vec!["x y".to_string()])])),
            Err(PartitionError::Identifier(_))
        ));
    }

    #[test]
    fn test_empty_index_columns_fall_back_to_column() {
        let partitioner = int_partitioner(0, 2, 1)
            .with_index_columns(IndexColumns(vec![]))
            .unwrap();
        assert_eq!(partitioner.index_columns(), &IndexColumns::for_column("c"));
        assert_eq!(
            partitioner.create_index_ddl().unwrap(),
            "CREATE INDEX t_0_0_index ON t_0 (c);\nCREATE INDEX t_1_0_index ON t_1 (c);"
        );
        assert_eq!(
            partitioner.drop_index_ddl().unwrap(),
            "DROP INDEX t_0_0_index;\nDROP INDEX t_1_0_index;"
        );
    }

    #[test]
    fn test_boxed_chunker() {
        let chunker: Box<dyn Chunker> = Box::new(IntChunker::new(0, 1, 1).unwrap());
        let partitioner = RangePartitioner::new(chunker, "t", "c").unwrap();
        assert_eq!(partitioner.drop_ddl().unwrap(), "DROP TABLE t_0;");
    }
}
