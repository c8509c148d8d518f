//! Buffer that outgrows a single array by switching to chunks.

use std::fmt;

use super::block::Block;
use super::chunks::{ChunkSizes, Chunks};
use super::{Buffer, Extent, MAX_BUFFER_LENGTH};
use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::pool::{BufferPools, Item};
use crate::util::items_in;

/// A growable buffer not bound by the maximum size of a single array.
///
/// While the buffer stays under [`BufferConfig::block0_limit`] it behaves
/// exactly like a [`ResizingBuffer`](crate::ResizingBuffer). Growing past the
/// limit moves the existing block into a chunk index and continues with
/// chunks that double in size up to [`BufferConfig::max_chunk_size`]. Once
/// chunked, the buffer stays chunked until it is cleared.
///
/// Sequential reads and writes cost O(1) chunk lookups: the buffer remembers
/// which chunk holds the cursor.
///
/// # Example
///
/// ```
/// use poolbuf::{Buffer, BufferConfig, ChunkedBuffer};
///
/// let config = BufferConfig::new(1024, 1024, 4096)?;
/// let mut buffer = ChunkedBuffer::<u8>::with_config(config)?;
///
/// buffer.write(&[7u8; 10_000])?;
/// assert!(buffer.is_chunked());
/// assert_eq!(buffer.len(), 10_000);
///
/// buffer.set_len(16)?;
/// assert_eq!(buffer.position(), 16);
/// # Ok::<(), poolbuf::BufferError>(())
/// ```
pub struct ChunkedBuffer<T: Item> {
    pools: BufferPools<T>,
    config: BufferConfig,
    extent: Extent,
    block: Block<T>,
    chunks: Option<Chunks<T>>,
}

impl<T: Item> ChunkedBuffer<T> {
    /// Creates an empty buffer with the default configuration and the
    /// shared pools.
    pub fn new() -> Self {
        Self::build(BufferPools::shared(), BufferConfig::default())
    }

    /// Creates an empty buffer with `config` and the shared pools.
    pub fn with_config(config: BufferConfig) -> Result<Self, BufferError> {
        Self::with_pools(BufferPools::shared(), config)
    }

    /// Creates an empty buffer drawing storage from `pools`.
    pub fn with_pools(pools: BufferPools<T>, config: BufferConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self::build(pools, config))
    }

    fn build(pools: BufferPools<T>, config: BufferConfig) -> Self {
        Self {
            pools,
            config,
            extent: Extent::default(),
            block: Block::default(),
            chunks: None,
        }
    }

    /// Returns the buffer configuration.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Returns the pools this buffer draws from.
    pub fn pools(&self) -> &BufferPools<T> {
        &self.pools
    }

    /// Whether the data lives in a chunk index rather than a single block.
    pub fn is_chunked(&self) -> bool {
        self.chunks.is_some()
    }

    /// Number of chunks (0 while the buffer uses a single block).
    pub fn chunk_count(&self) -> usize {
        self.chunks.as_ref().map_or(0, Chunks::len)
    }

    /// The content as a sequence of slices, in order, without copying.
    ///
    /// A single-block buffer yields one slice.
    pub fn slices(&self) -> Box<dyn Iterator<Item = &[T]> + '_> {
        match &self.chunks {
            Some(chunks) => Box::new(chunks.slices(&self.extent)),
            None => {
                let block = self.block.peek(&self.extent);
                Box::new((!block.is_empty()).then_some(block).into_iter())
            }
        }
    }

    /// Deep-copies the buffer into new storage from the same pools.
    ///
    /// The copy has the same configuration, content and cursor.
    pub fn try_clone(&self) -> Result<Self, BufferError> {
        let mut copy = Self::build(self.pools.clone(), self.config);
        for slice in self.slices() {
            copy.write(slice)?;
        }
        copy.set_position(self.extent.position)?;
        Ok(copy)
    }

    fn block0_limit(&self) -> u64 {
        items_in::<T>(self.config.block0_limit()) as u64
    }

    fn chunk_sizes(&self) -> ChunkSizes {
        ChunkSizes {
            first: items_in::<T>(self.config.first_chunk_size()),
            max: items_in::<T>(self.config.max_chunk_size()),
        }
    }

    fn expand(&mut self, length: u64) -> Result<u64, BufferError> {
        if self.chunks.is_none() && !self.config.chunk_mode() && length <= self.block0_limit() {
            return self
                .block
                .expand(&mut self.extent, &self.pools.items, length);
        }

        if length > MAX_BUFFER_LENGTH {
            return Err(BufferError::CapacityExceeded {
                requested: length,
                max: MAX_BUFFER_LENGTH,
            });
        }

        let sizes = self.chunk_sizes();
        let chunks = self
            .chunks
            .get_or_insert_with(|| Chunks::new(&self.pools, self.block.take()));
        Ok(chunks.expand(&mut self.extent, &self.pools.items, sizes, length))
    }

    fn shrink(&mut self, length: u64) -> Result<u64, BufferError> {
        match &mut self.chunks {
            Some(chunks) => Ok(chunks.shrink(&mut self.extent, &self.pools.items, length)),
            None => self.block.shrink(&mut self.extent, &self.pools.items, length),
        }
    }

    fn try_expand_before_write(&mut self, end: u64) -> Result<u64, BufferError> {
        if end > self.extent.capacity {
            self.expand(end)
        } else {
            if end > self.extent.length {
                self.extent.length = end;
            }
            Ok(self.extent.length)
        }
    }
}

impl<T: Item> Buffer<T> for ChunkedBuffer<T> {
    #[inline]
    fn position(&self) -> u64 {
        self.extent.position
    }

    fn set_position(&mut self, position: u64) -> Result<u64, BufferError> {
        let position = position.min(self.extent.length);
        match &mut self.chunks {
            Some(chunks) => chunks.seek(&mut self.extent, position),
            None => {
                self.extent.position = position;
                Ok(position)
            }
        }
    }

    #[inline]
    fn len(&self) -> u64 {
        self.extent.length
    }

    #[inline]
    fn capacity(&self) -> u64 {
        self.extent.capacity
    }

    fn set_len(&mut self, length: u64) -> Result<u64, BufferError> {
        if length > self.extent.capacity {
            self.expand(length)
        } else if length == 0 {
            self.clear();
            Ok(0)
        } else if length < self.extent.length {
            self.shrink(length)
        } else {
            self.extent.length = length;
            Ok(length)
        }
    }

    fn read(&mut self, target: &mut [T]) -> usize {
        match &mut self.chunks {
            Some(chunks) => chunks.read(&mut self.extent, target),
            None => self.block.read(&mut self.extent, target),
        }
    }

    fn write(&mut self, source: &[T]) -> Result<usize, BufferError> {
        let end = self.extent.write_end(source.len())?;
        self.try_expand_before_write(end)?;
        match &mut self.chunks {
            Some(chunks) => chunks.write(&mut self.extent, source),
            None => Ok(self.block.write(&mut self.extent, source)),
        }
    }

    fn export_to(&self, target: &mut [T]) -> usize {
        match &self.chunks {
            Some(chunks) => chunks.export_to(&self.extent, target),
            None => self.block.export_to(&self.extent, target),
        }
    }

    fn clear(&mut self) {
        match self.chunks.take() {
            Some(mut chunks) => chunks.clear(&mut self.extent, &self.pools.items),
            None => self.block.clear(&mut self.extent, &self.pools.items),
        }
    }
}

impl<T: Item> Default for ChunkedBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> Drop for ChunkedBuffer<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Item> fmt::Debug for ChunkedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedBuffer")
            .field("length", &self.extent.length)
            .field("capacity", &self.extent.capacity)
            .field("position", &self.extent.position)
            .field("chunks", &self.chunk_count())
            .finish()
    }
}
