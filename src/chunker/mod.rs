use crate::{error::Result, Chunk};

pub use self::{
    integer::{IntChunker, IntChunks},
    month::{MonthChunker, MonthChunks},
};

mod integer;
mod month;

/// Decomposes a partitioning domain into contiguous half-open chunks.
///
/// Every call to [`Chunker::chunks`] starts a fresh traversal from the configured start,
/// so a chunker can be rendered from any number of times.
pub trait Chunker {
    /// Returns a lazy iterator over the chunks, in ascending order.
    fn chunks(&self) -> Result<Box<dyn Iterator<Item = Chunk> + '_>>;
}

impl<C: Chunker + ?Sized> Chunker for Box<C> {
    fn chunks(&self) -> Result<Box<dyn Iterator<Item = Chunk> + '_>> {
        (**self).chunks()
    }
}

impl<'a, C: Chunker + ?Sized> Chunker for &'a C {
    fn chunks(&self) -> Result<Box<dyn Iterator<Item = Chunk> + '_>> {
        (**self).chunks()
    }
}
