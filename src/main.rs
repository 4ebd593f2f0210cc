//! pgpartition
//!
//! Prints the DDL, routing function and trigger that partition a PostgreSQL table by
//! ranges of one column. Nothing is executed; pipe the output into `psql`.

use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use log::{debug, info, warn};
use partitioner::utils::{parse_integer, DEFAULT_MONTH_FORMAT};
use partitioner::{
    Artifact, DomainPlan, IndexGroup, PartitionError, PartitionPlan, Partitioned, Render,
};

#[derive(Parser)]
#[command(name = "pgpartition")]
#[command(about = "Generate SQL that range-partitions a table through inheritance")]
#[command(version)]
struct Cli {
    /// Master table to partition [REQ unless --plan]
    #[arg(short, long)]
    master_table: Option<String>,

    /// Partitioning column [REQ unless --plan]
    #[arg(short, long)]
    column: Option<String>,

    /// First partitioning column value [REQ unless --plan]
    #[arg(long, allow_hyphen_values = true)]
    start: Option<String>,

    /// Final partitioning column value [REQ unless --plan]
    #[arg(long, allow_hyphen_values = true)]
    end: Option<String>,

    /// Width of each partition (start:1, stride:2 gives 1 <= col < 3, 3 <= col < 5, ...)
    #[arg(long, default_value = "1")]
    stride: i64,

    /// Treat start and end as months and partition by calendar month
    #[arg(long)]
    month: bool,

    /// chrono format of start and end with --month
    #[arg(long, default_value = DEFAULT_MONTH_FORMAT)]
    format: String,

    /// Comma separated columns of one index per partition; repeat for more indexes
    #[arg(short, long = "index-columns")]
    index_columns: Vec<IndexGroup>,

    /// RON partition plan replacing the table, column and domain options
    #[arg(long, conflicts_with_all = ["master_table", "column", "start", "end", "month"])]
    plan: Option<PathBuf>,

    /// Print the chunks as RON
    #[arg(long)]
    list_chunks: bool,

    /// DDL creating the partition tables
    #[arg(long)]
    create_ddl: bool,

    /// DDL dropping the partition tables
    #[arg(long)]
    drop_ddl: bool,

    /// Insert function routing rows to partitions (replaces an existing one)
    #[arg(long)]
    create_function: bool,

    /// Trigger calling the insert function
    #[arg(long)]
    create_trigger: bool,

    /// Drop the insert trigger
    #[arg(long)]
    drop_trigger: bool,

    /// DDL creating indexes on every partition
    #[arg(long)]
    create_index_ddl: bool,

    /// DDL dropping indexes on every partition
    #[arg(long)]
    drop_index_ddl: bool,

    /// SQL to run against every partition (ie "VACUUM {table};")
    #[arg(long)]
    arbitrary_sql: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn has_output(&self) -> bool {
        self.list_chunks || !self.artifacts().is_empty()
    }

    fn artifacts(&self) -> Vec<Artifact> {
        let flags = [
            (self.create_ddl, Artifact::CreateDdl),
            (self.drop_ddl, Artifact::DropDdl),
            (self.create_function, Artifact::Function),
            (self.create_trigger, Artifact::Trigger),
            (self.drop_trigger, Artifact::DropTrigger),
            (self.create_index_ddl, Artifact::CreateIndexDdl),
            (self.drop_index_ddl, Artifact::DropIndexDdl),
        ];
        let mut artifacts: Vec<Artifact> = flags
            .into_iter()
            .filter_map(|(selected, artifact)| selected.then_some(artifact))
            .collect();
        if let Some(sql) = &self.arbitrary_sql {
            artifacts.push(Artifact::Sql(sql.clone()));
        }
        artifacts
    }

    fn plan(&self) -> Result<PartitionPlan, PartitionError> {
        let mut plan = match &self.plan {
            Some(path) => PartitionPlan::load(path)?,
            None => self.plan_from_flags()?,
        };
        if !self.index_columns.is_empty() {
            plan.index_columns = Some(
                self.index_columns
                    .iter()
                    .map(|group| group.columns().to_vec())
                    .collect(),
            );
        }
        Ok(plan)
    }

    fn plan_from_flags(&self) -> Result<PartitionPlan, PartitionError> {
        let (Some(master_table), Some(column), Some(start), Some(end)) =
            (&self.master_table, &self.column, &self.start, &self.end)
        else {
            return Err(PartitionError::Config(
                "--master-table, --column, --start and --end are required without --plan"
                    .to_string(),
            ));
        };
        let domain = if self.month {
            let stride = u32::try_from(self.stride).map_err(|_| {
                PartitionError::Domain(format!("Invalid month stride {}", self.stride))
            })?;
            DomainPlan::Month {
                start: start.clone(),
                end: end.clone(),
                stride,
                format: self.format.clone(),
            }
        } else {
            DomainPlan::Integer {
                start: parse_integer(start)?,
                end: parse_integer(end)?,
                stride: self.stride,
            }
        };
        Ok(PartitionPlan {
            master_table: master_table.clone(),
            column: column.clone(),
            domain,
            index_columns: None,
        })
    }
}

fn run(cli: &Cli) -> Result<(), PartitionError> {
    let plan = cli.plan()?;
    debug!("{:?}", plan);
    let partitioner = plan.build()?;

    // Render everything before printing so a failure prints no SQL at all.
    let mut output = Vec::new();
    if cli.list_chunks {
        let chunks = partitioner.chunks()?;
        let pretty = ron::ser::PrettyConfig::default();
        output.push(
            ron::ser::to_string_pretty(&chunks, pretty)
                .map_err(|err| PartitionError::Config(err.to_string()))?,
        );
    }
    for artifact in cli.artifacts() {
        info!("rendering {} for {}", artifact, plan.master_table);
        output.push(partitioner.render(&artifact)?);
    }
    for text in output {
        println!("{}", text);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    if !cli.has_output() {
        warn!("no output selected");
        let _ = Cli::command().print_help();
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pgpartition").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_index_columns_use_group_parser() {
        let cli = parse(&[
            "-m", "t", "-c", "c", "--start", "0", "--end", "2", "-i", "a,", "-i", "b, c",
            "--create-index-ddl",
        ]);
        assert_eq!(
            cli.plan().unwrap().index_columns,
            Some(vec![
                vec!["a".to_string()],
                vec!["b".to_string(), "c".to_string()]
            ])
        );
        assert!(Cli::try_parse_from(["pgpartition", "-i", "a b"]).is_err());
    }

    #[test]
    fn test_negative_bounds() {
        let cli = parse(&["-m", "t", "-c", "c", "--start", "-2", "--end", "0", "--drop-ddl"]);
        assert_eq!(
            cli.plan().unwrap().domain,
            DomainPlan::Integer {
                start: -2,
                end: 0,
                stride: 1
            }
        );
    }

    #[test]
    fn test_output_selection() {
        let cli = parse(&["-m", "t", "-c", "c", "--start", "0", "--end", "2"]);
        assert!(!cli.has_output());
        assert!(parse(&["--plan", "plan.ron", "--list-chunks"]).has_output());
        let cli = parse(&[
            "-m", "t", "-c", "c", "--start", "0", "--end", "2", "--arbitrary-sql", "VACUUM {table};",
            "--create-ddl",
        ]);
        assert_eq!(
            cli.artifacts(),
            vec![Artifact::CreateDdl, Artifact::Sql("VACUUM {table};".to_string())]
        );
    }
}
