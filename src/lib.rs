mod error;

pub mod chunker;
pub mod config;
pub mod range;
pub mod template;
pub mod types;
pub mod utils;
pub use chunker::{Chunker, IntChunker, MonthChunker};
pub use config::{DomainPlan, DynPartitioner, PartitionPlan};
pub use error::{PartitionError, Result};
pub use range::*;
pub use types::*;
