pub use self::{
    chunk::Chunk,
    index_columns::{IndexColumns, IndexGroup},
    partition_value::PartitionValue,
};

mod chunk;
mod index_columns;
mod partition_value;
