//! Partition plans: a whole partitioning run described in one RON document.
//!
//! ```ron
//! (
//!     master_table: "measurements",
//!     column: "logdate",
//!     domain: Month(start: "2012-01", end: "2012-04"),
//!     index_columns: Some([["logdate"], ["city_id", "logdate"]]),
//! )
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::chunker::{Chunker, IntChunker, MonthChunker};
use crate::error::{PartitionError, Result};
use crate::utils::DEFAULT_MONTH_FORMAT;
use crate::{IndexColumns, RangePartitioner};

/// A partitioner whose chunker is picked at runtime.
pub type DynPartitioner = RangePartitioner<Box<dyn Chunker + Send + Sync>>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum DomainPlan {
    Integer {
        start: i64,
        end: i64,
        #[serde(default = "default_int_stride")]
        stride: i64,
    },
    Month {
        start: String,
        end: String,
        #[serde(default = "default_month_stride")]
        stride: u32,
        #[serde(default = "default_format")]
        format: String,
    },
}

fn default_int_stride() -> i64 {
    1
}
fn default_month_stride() -> u32 {
    1
}
fn default_format() -> String {
    DEFAULT_MONTH_FORMAT.to_string()
}

impl DomainPlan {
    pub fn chunker(&self) -> Result<Box<dyn Chunker + Send + Sync>> {
        Ok(match self {
            DomainPlan::Integer { start, end, stride } => {
                Box::new(IntChunker::new(*start, *end, *stride)?)
            }
            DomainPlan::Month {
                start,
                end,
                stride,
                format,
            } => Box::new(MonthChunker::with_stride(start, end, *stride, format)?),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    pub master_table: String,
    pub column: String,
    pub domain: DomainPlan,
    #[serde(default)]
    pub index_columns: Option<Vec<Vec<String>>>,
}

impl PartitionPlan {
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("loading partition plan from {}", path.display());
        let source = fs::read_to_string(path).map_err(|err| {
            PartitionError::Config(format!("Could not read {}. {}", path.display(), err))
        })?;
        Self::from_ron(&source)
    }

    /// Validates the plan and builds its partitioner.
    pub fn build(&self) -> Result<DynPartitioner> {
        let partitioner =
            RangePartitioner::new(self.domain.chunker()?, &self.master_table, &self.column)?;
        match &self.index_columns {
            Some(groups) => partitioner.with_index_columns(IndexColumns::from(groups.clone())),
            None => Ok(partitioner),
        }
    }
}
