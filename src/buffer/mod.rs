//! Growable pooled buffers.
//!
//! - [`Buffer`] - The capability set every buffer implements
//! - [`ResizingBuffer`] - Single pooled array, fastest for small and medium data
//! - [`ChunkedBuffer`] - Single array while small, a list of chunks once large
//!
//! Both buffers hold `length`, `capacity` and `position` with
//! `position <= length <= capacity`. Growing the length exposes items with
//! unspecified contents: storage is recycled, not cleared.

mod block;
mod chunked;
mod chunks;
mod resizing;

pub use chunked::ChunkedBuffer;
pub use chunks::Chunk;
pub use resizing::ResizingBuffer;

use crate::error::BufferError;
use crate::pool::Item;

/// Largest length any buffer can reach, in items.
pub const MAX_BUFFER_LENGTH: u64 = i64::MAX as u64;

/// A growable buffer with a cursor, like an in-memory file.
///
/// Writes always succeed in full (short of [`BufferError::CapacityExceeded`]),
/// reads and exports copy as much as is available and report the count.
///
/// # Example
///
/// ```
/// use poolbuf::{Buffer, ChunkedBuffer};
///
/// let mut buffer = ChunkedBuffer::<u8>::new();
/// buffer.write(b"hello world")?;
/// buffer.set_position(6)?;
///
/// let mut word = [0u8; 16];
/// let read = buffer.read(&mut word);
/// assert_eq!(&word[..read], b"world");
/// # Ok::<(), poolbuf::BufferError>(())
/// ```
pub trait Buffer<T: Item> {
    /// Current cursor position.
    fn position(&self) -> u64;

    /// Moves the cursor, clamping it to `[0, len]`. Returns the new position.
    fn set_position(&mut self, position: u64) -> Result<u64, BufferError>;

    /// Logical length, in items.
    fn len(&self) -> u64;

    /// Returns true if the buffer holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of items currently backed by storage.
    fn capacity(&self) -> u64;

    /// Sets the logical length.
    ///
    /// Zero releases all storage. Growing past the capacity allocates more,
    /// shrinking may move the data to smaller storage and pulls the cursor
    /// back if it was past the new end.
    fn set_len(&mut self, length: u64) -> Result<u64, BufferError>;

    /// Reads from the cursor into `target`, returning the number of items
    /// copied (0 at the end of data).
    fn read(&mut self, target: &mut [T]) -> usize;

    /// Writes all of `source` at the cursor, growing as needed.
    fn write(&mut self, source: &[T]) -> Result<usize, BufferError>;

    /// Copies the buffer from offset 0 into `target`, ignoring the cursor.
    ///
    /// Copies `min(target.len(), len)` items and returns that count.
    fn export_to(&self, target: &mut [T]) -> usize;

    /// Returns all storage to the pool and resets to an empty buffer.
    fn clear(&mut self);

    /// Releases all storage. The buffer stays usable as an empty buffer.
    fn dispose(&mut self) {
        self.clear();
    }

    /// Copies the whole content into a new `Vec`.
    fn to_vec(&self) -> Vec<T> {
        let length = usize::try_from(self.len()).unwrap_or(usize::MAX);
        let mut target = vec![T::default(); length];
        let exported = self.export_to(&mut target);
        target.truncate(exported);
        target
    }
}

/// Cursor and size bookkeeping shared by both buffer kinds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Extent {
    pub(crate) length: u64,
    pub(crate) capacity: u64,
    pub(crate) position: u64,
}

impl Extent {
    #[inline]
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Items between the cursor and the end of data.
    #[inline]
    pub(crate) fn remaining(&self) -> u64 {
        self.length - self.position
    }

    /// End of a write of `count` items at the cursor.
    #[inline]
    pub(crate) fn write_end(&self, count: usize) -> Result<u64, BufferError> {
        self.position
            .checked_add(count as u64)
            .filter(|end| *end <= MAX_BUFFER_LENGTH)
            .ok_or(BufferError::CapacityExceeded {
                requested: self.position.saturating_add(count as u64),
                max: MAX_BUFFER_LENGTH,
            })
    }
}
