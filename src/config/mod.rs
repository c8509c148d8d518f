//! Configuration for pools and buffers.
//!
//! - [`PoolConfig`] - Size classes and retention limits of an [`ArrayPool`](crate::ArrayPool)
//! - [`BufferConfig`] - Block ceiling and chunk sizing of a [`ChunkedBuffer`](crate::ChunkedBuffer)
//!
//! All sizes are expressed in bytes and converted to items of the element
//! type when used, so the same configuration means the same memory footprint
//! for a `u8` buffer and a `char` buffer.
//!
//! # Example
//!
//! ```
//! use poolbuf::{BufferConfig, PoolConfig};
//!
//! let config = BufferConfig::new(16 * 1024, 64 * 1024, 1024 * 1024)?;
//! assert_eq!(config.block0_limit(), 16 * 1024);
//!
//! let pool = PoolConfig::default().with_arrays_per_bucket(8);
//! pool.validate()?;
//! # Ok::<(), poolbuf::BufferError>(())
//! ```

use crate::error::BufferError;

/// Default minimum size of an array worth pooling (1 KiB).
pub const DEFAULT_MIN_POOLED_BYTES: usize = 1024;

/// Default size of the largest pooled size class (16 MiB).
pub const DEFAULT_MAX_POOLED_BYTES: usize = 16 * 1024 * 1024;

/// Default number of idle arrays kept per size class.
pub const DEFAULT_ARRAYS_PER_BUCKET: usize = 32;

/// Default size above which a chunked buffer leaves its single block (64 KiB).
pub const DEFAULT_BLOCK0_LIMIT: usize = 64 * 1024;

/// Default size of the first chunk allocated after migration (64 KiB).
pub const DEFAULT_FIRST_CHUNK_SIZE: usize = 64 * 1024;

/// Default maximum size of a single chunk (1 MiB).
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Configuration of an array pool.
///
/// Arrays smaller than `min_pooled_bytes` are allocated directly and never
/// pooled; arrays larger than `max_pooled_bytes` are allocated directly and
/// dropped when returned. In between, arrays are grouped into power-of-two
/// size classes holding at most `arrays_per_bucket` idle arrays each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    min_pooled_bytes: usize,
    max_pooled_bytes: usize,
    arrays_per_bucket: usize,
}

impl PoolConfig {
    /// Creates a new pool configuration.
    ///
    /// Returns error if the sizes are zero, not powers of 2, or out of order,
    /// or if `arrays_per_bucket` is zero.
    pub fn new(
        min_pooled_bytes: usize,
        max_pooled_bytes: usize,
        arrays_per_bucket: usize,
    ) -> Result<Self, BufferError> {
        if min_pooled_bytes == 0 || max_pooled_bytes == 0 {
            return Err(BufferError::InvalidConfig {
                message: "pooled sizes must be non-zero",
            });
        }

        if !min_pooled_bytes.is_power_of_two() || !max_pooled_bytes.is_power_of_two() {
            return Err(BufferError::InvalidConfig {
                message: "pooled sizes must be powers of 2",
            });
        }

        if min_pooled_bytes > max_pooled_bytes {
            return Err(BufferError::InvalidConfig {
                message: "min_pooled_bytes cannot be greater than max_pooled_bytes",
            });
        }

        if arrays_per_bucket == 0 {
            return Err(BufferError::InvalidConfig {
                message: "arrays_per_bucket must be non-zero",
            });
        }

        Ok(Self {
            min_pooled_bytes,
            max_pooled_bytes,
            arrays_per_bucket,
        })
    }

    /// Sets the minimum pooled array size (not validated).
    pub fn with_min_pooled_bytes(mut self, size: usize) -> Self {
        self.min_pooled_bytes = size;
        self
    }

    /// Sets the largest pooled size class (not validated).
    pub fn with_max_pooled_bytes(mut self, size: usize) -> Self {
        self.max_pooled_bytes = size;
        self
    }

    /// Sets how many idle arrays each size class retains (not validated).
    pub fn with_arrays_per_bucket(mut self, count: usize) -> Self {
        self.arrays_per_bucket = count;
        self
    }

    /// Returns the minimum pooled array size in bytes.
    pub fn min_pooled_bytes(&self) -> usize {
        self.min_pooled_bytes
    }

    /// Returns the largest pooled size class in bytes.
    pub fn max_pooled_bytes(&self) -> usize {
        self.max_pooled_bytes
    }

    /// Returns how many idle arrays each size class retains.
    pub fn arrays_per_bucket(&self) -> usize {
        self.arrays_per_bucket
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), BufferError> {
        Self::new(
            self.min_pooled_bytes,
            self.max_pooled_bytes,
            self.arrays_per_bucket,
        )
        .map(|_| ())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_pooled_bytes: DEFAULT_MIN_POOLED_BYTES,
            max_pooled_bytes: DEFAULT_MAX_POOLED_BYTES,
            arrays_per_bucket: DEFAULT_ARRAYS_PER_BUCKET,
        }
    }
}

/// Configuration of a chunked buffer.
///
/// A chunked buffer keeps its data in a single pooled block while it is no
/// larger than `block0_limit`. Growing past it moves the block into a chunk
/// index and continues with chunks that double in size, from
/// `first_chunk_size` up to `max_chunk_size`.
///
/// With `chunk_mode` set the buffer uses chunks from the first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferConfig {
    block0_limit: usize,
    first_chunk_size: usize,
    max_chunk_size: usize,
    chunk_mode: bool,
}

impl BufferConfig {
    /// Creates a new configuration.
    ///
    /// Returns error if sizes are zero, not powers of 2, or if
    /// `first_chunk_size > max_chunk_size`.
    pub fn new(
        block0_limit: usize,
        first_chunk_size: usize,
        max_chunk_size: usize,
    ) -> Result<Self, BufferError> {
        if block0_limit == 0 || first_chunk_size == 0 || max_chunk_size == 0 {
            return Err(BufferError::InvalidConfig {
                message: "buffer sizes must be non-zero",
            });
        }

        if !block0_limit.is_power_of_two()
            || !first_chunk_size.is_power_of_two()
            || !max_chunk_size.is_power_of_two()
        {
            return Err(BufferError::InvalidConfig {
                message: "buffer sizes must be powers of 2",
            });
        }

        if first_chunk_size > max_chunk_size {
            return Err(BufferError::InvalidConfig {
                message: "first_chunk_size cannot be greater than max_chunk_size",
            });
        }

        Ok(Self {
            block0_limit,
            first_chunk_size,
            max_chunk_size,
            chunk_mode: false,
        })
    }

    /// Configuration that skips the single block and always uses chunks.
    pub fn chunked() -> Self {
        Self::default().with_chunk_mode(true)
    }

    /// Sets the single block ceiling (not validated).
    pub fn with_block0_limit(mut self, size: usize) -> Self {
        self.block0_limit = size;
        self
    }

    /// Sets the size of the first chunk (not validated).
    pub fn with_first_chunk_size(mut self, size: usize) -> Self {
        self.first_chunk_size = size;
        self
    }

    /// Sets the maximum chunk size (not validated).
    pub fn with_max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    /// Enables or disables chunk mode.
    pub fn with_chunk_mode(mut self, enabled: bool) -> Self {
        self.chunk_mode = enabled;
        self
    }

    /// Returns the single block ceiling in bytes.
    pub fn block0_limit(&self) -> usize {
        self.block0_limit
    }

    /// Returns the first chunk size in bytes.
    pub fn first_chunk_size(&self) -> usize {
        self.first_chunk_size
    }

    /// Returns the maximum chunk size in bytes.
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Returns whether the buffer skips the single block.
    pub fn chunk_mode(&self) -> bool {
        self.chunk_mode
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), BufferError> {
        Self::new(self.block0_limit, self.first_chunk_size, self.max_chunk_size).map(|_| ())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            block0_limit: DEFAULT_BLOCK0_LIMIT,
            first_chunk_size: DEFAULT_FIRST_CHUNK_SIZE,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            chunk_mode: false,
        }
    }
}
