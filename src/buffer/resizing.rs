//! Buffer backed by a single pooled array.

use std::fmt;

use super::block::Block;
use super::{Buffer, Extent};
use crate::error::BufferError;
use crate::pool::{ArrayPool, Item};

/// A growable buffer stored in one pooled array.
///
/// The fastest option while data stays reasonably small. The whole content
/// is contiguous, which allows [`peek`](Self::peek). It cannot grow past
/// [`MAX_ARRAY_ITEMS`](crate::pool::MAX_ARRAY_ITEMS); use a
/// [`ChunkedBuffer`](crate::ChunkedBuffer) for larger data.
///
/// # Example
///
/// ```
/// use poolbuf::{Buffer, ResizingBuffer};
///
/// let mut buffer = ResizingBuffer::<u8>::new();
/// buffer.write(b"hello")?;
/// assert_eq!(buffer.peek(), b"hello");
/// # Ok::<(), poolbuf::BufferError>(())
/// ```
pub struct ResizingBuffer<T: Item> {
    pool: ArrayPool<T>,
    extent: Extent,
    block: Block<T>,
}

impl<T: Item> ResizingBuffer<T> {
    /// Creates an empty buffer drawing from the shared pool of `T`.
    pub fn new() -> Self {
        Self::with_pool(T::shared_pools().items.clone())
    }

    /// Creates an empty buffer drawing storage from `pool`.
    pub fn with_pool(pool: ArrayPool<T>) -> Self {
        Self {
            pool,
            extent: Extent::default(),
            block: Block::default(),
        }
    }

    /// Returns the pool this buffer draws from.
    pub fn pool(&self) -> &ArrayPool<T> {
        &self.pool
    }

    /// Borrows the content without copying.
    ///
    /// The slice aliases pooled storage. The borrow keeps the buffer from
    /// being modified, so the storage cannot be recycled while the slice is
    /// alive.
    pub fn peek(&self) -> &[T] {
        self.block.peek(&self.extent)
    }

    /// Mutably borrows the content without copying.
    pub fn peek_mut(&mut self) -> &mut [T] {
        self.block.peek_mut(&self.extent)
    }

    /// Deep-copies the buffer into new storage from the same pool.
    pub fn try_clone(&self) -> Result<Self, BufferError> {
        let mut copy = Self::with_pool(self.pool.clone());
        copy.write(self.peek())?;
        copy.set_position(self.extent.position)?;
        Ok(copy)
    }
}

impl<T: Item> Buffer<T> for ResizingBuffer<T> {
    #[inline]
    fn position(&self) -> u64 {
        self.extent.position
    }

    fn set_position(&mut self, position: u64) -> Result<u64, BufferError> {
        self.extent.position = position.min(self.extent.length);
        Ok(self.extent.position)
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
            self.block.expand(&mut self.extent, &self.pool, length)
        } else if length == 0 {
            self.clear();
            Ok(0)
        } else if length < self.extent.length {
            self.block.shrink(&mut self.extent, &self.pool, length)
        } else {
            self.extent.length = length;
            Ok(length)
        }
    }

    fn read(&mut self, target: &mut [T]) -> usize {
        self.block.read(&mut self.extent, target)
    }

    fn write(&mut self, source: &[T]) -> Result<usize, BufferError> {
        let end = self.extent.write_end(source.len())?;
        if end > self.extent.capacity {
            self.block.expand(&mut self.extent, &self.pool, end)?;
        } else if end > self.extent.length {
            self.extent.length = end;
        }
        Ok(self.block.write(&mut self.extent, source))
    }

    fn export_to(&self, target: &mut [T]) -> usize {
        self.block.export_to(&self.extent, target)
    }

    fn clear(&mut self) {
        self.block.clear(&mut self.extent, &self.pool);
    }
}

impl<T: Item> Default for ResizingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> Drop for ResizingBuffer<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Item> fmt::Debug for ResizingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizingBuffer")
            .field("length", &self.extent.length)
            .field("capacity", &self.extent.capacity)
            .field("position", &self.extent.position)
            .finish()
    }
}
