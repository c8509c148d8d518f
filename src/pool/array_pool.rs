//! Shared array pool with power-of-two size classes.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::PoolConfig;
use crate::error::BufferError;
use crate::util::{items_in, round_down_pow2};

/// Largest number of items a single array may hold.
pub const MAX_ARRAY_ITEMS: usize = 0x7FFF_FFC7;

/// Largest length still rounded up to a power of two.
pub const SAFE_ARRAY_ITEMS: usize = 0x4000_0000 - 1;

/// Smallest array allocated for a non-empty buffer (256 B).
pub const MIN_ALLOCATED_SIZE_BYTES: usize = 256;

/// Size big enough to be worth pooling but small enough to be cheap (64 KiB).
pub const OPTIMAL_POOLED_SIZE_BYTES: usize = 64 * 1024;

/// A pool of reusable arrays of `T`.
///
/// `ArrayPool` is a cheap handle; clones share the same storage. Arrays are
/// grouped by power-of-two length. Arrays too small to be worth pooling are
/// allocated directly and simply dropped when recycled, and so are arrays
/// larger than the biggest size class.
///
/// Recycling moves the array into the pool, so nothing can keep using it
/// afterwards. The next `allocate` of the same size class may hand it to any
/// other owner, with its old contents intact.
///
/// # Example
///
/// ```
/// use poolbuf::ArrayPool;
///
/// let pool = ArrayPool::<u8>::new();
/// let array = pool.allocate(4000);
/// assert_eq!(array.len(), 4096);
///
/// pool.recycle(array);
/// assert_eq!(pool.retained(), 1);
///
/// let again = pool.allocate(3000);
/// assert_eq!(again.len(), 4096);
/// assert_eq!(pool.retained(), 0);
/// ```
pub struct ArrayPool<T> {
    inner: Arc<PoolInner<T>>,
}

struct PoolInner<T> {
    config: PoolConfig,
    /// Length of the smallest size class (a power of two).
    min_class: usize,
    /// Length of the largest size class (a power of two, 0 if none).
    max_class: usize,
    buckets: Mutex<Vec<Vec<Box<[T]>>>>,
}

impl<T> Clone for ArrayPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ArrayPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayPool")
            .field("config", &self.inner.config)
            .field("min_class", &self.inner.min_class)
            .field("max_class", &self.inner.max_class)
            .finish()
    }
}

impl<T: Default> Default for ArrayPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> ArrayPool<T> {
    /// Creates a private pool with the default configuration.
    pub fn new() -> Self {
        Self::build(PoolConfig::default())
    }

    /// Creates a private pool with the given configuration.
    pub fn with_config(config: PoolConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PoolConfig) -> Self {
        let min_class = items_in::<T>(config.min_pooled_bytes()).next_power_of_two();
        let max_class = round_down_pow2(items_in::<T>(config.max_pooled_bytes()));
        let classes = if max_class >= min_class {
            (max_class.trailing_zeros() - min_class.trailing_zeros()) as usize + 1
        } else {
            0
        };

        Self {
            inner: Arc::new(PoolInner {
                config,
                min_class,
                max_class,
                buckets: Mutex::new((0..classes).map(|_| Vec::new()).collect()),
            }),
        }
    }

    /// Returns the pool configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Smallest array allocated for a non-empty request, in items.
    #[inline]
    pub fn min_allocated_size() -> usize {
        items_in::<T>(MIN_ALLOCATED_SIZE_BYTES)
    }

    /// Size of a scratch array worth renting, in items.
    #[inline]
    pub fn optimal_pooled_size() -> usize {
        items_in::<T>(OPTIMAL_POOLED_SIZE_BYTES)
    }

    /// Arrays shorter than this are never pooled, in items.
    #[inline]
    pub fn min_pooled_size(&self) -> usize {
        items_in::<T>(self.inner.config.min_pooled_bytes())
    }

    /// Largest pooled size class, in items.
    #[inline]
    pub fn max_pooled_size(&self) -> usize {
        self.inner.max_class
    }

    /// Allocates an array of at least `size` items.
    ///
    /// Empty for `size == 0`, exactly `size` items when the array is too
    /// small to be pooled, otherwise a power-of-two array from the pool.
    pub fn allocate(&self, size: usize) -> Box<[T]> {
        if size == 0 {
            return Box::default();
        }

        if size < self.min_pooled_size() {
            return fresh(size);
        }

        self.rent(size)
    }

    /// Allocates a scratch array of roughly `hint` items, capped at the
    /// optimal pooled size. It may be smaller than `hint`.
    pub fn allocate_chunk(&self, hint: usize) -> Box<[T]> {
        self.allocate(hint.min(Self::optimal_pooled_size()))
    }

    /// Returns an array to the pool.
    ///
    /// Arrays which do not fit a size class, or whose class is full, are
    /// dropped.
    pub fn recycle(&self, array: Box<[T]>) {
        let length = array.len();
        if length < self.min_pooled_size() {
            return;
        }

        let Some(class) = self.class_of(length) else {
            tracing::trace!(length, "array does not fit a size class, dropping");
            return;
        };

        let mut buckets = self.inner.buckets.lock();
        let bucket = &mut buckets[class];
        if bucket.len() < self.inner.config.arrays_per_bucket() {
            bucket.push(array);
        }
    }

    /// Number of idle arrays currently held by the pool.
    pub fn retained(&self) -> usize {
        self.inner.buckets.lock().iter().map(Vec::len).sum()
    }

    /// Drops all idle arrays, returning how many were released.
    pub fn trim(&self) -> usize {
        let mut buckets = self.inner.buckets.lock();
        let released = buckets.iter().map(Vec::len).sum();
        for bucket in buckets.iter_mut() {
            bucket.clear();
        }
        tracing::debug!(released, "array pool trimmed");
        released
    }

    /// Computes the capacity backing a buffer of `length` items.
    ///
    /// Lengths up to the minimum allocation get the minimum allocation, then
    /// capacities go up in powers of two until [`SAFE_ARRAY_ITEMS`], and are
    /// clamped to [`MAX_ARRAY_ITEMS`] beyond that.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityExceeded`] when `length` is larger than
    /// [`MAX_ARRAY_ITEMS`].
    pub fn rounded_size(length: u64) -> Result<usize, BufferError> {
        let minimum = Self::min_allocated_size() as u64;
        match length {
            0 => Ok(0),
            n if n <= minimum => Ok(minimum as usize),
            n if n <= SAFE_ARRAY_ITEMS as u64 => Ok((n as usize).next_power_of_two()),
            n if n <= MAX_ARRAY_ITEMS as u64 => Ok(MAX_ARRAY_ITEMS),
            n => Err(BufferError::CapacityExceeded {
                requested: n,
                max: MAX_ARRAY_ITEMS as u64,
            }),
        }
    }

    fn rent(&self, size: usize) -> Box<[T]> {
        let length = size.next_power_of_two();
        let Some(class) = self.class_of(length) else {
            return fresh(size);
        };

        let reused = self.inner.buckets.lock()[class].pop();
        reused.unwrap_or_else(|| fresh(length))
    }

    fn class_of(&self, length: usize) -> Option<usize> {
        let inner = &self.inner;
        if !length.is_power_of_two() || length < inner.min_class || length > inner.max_class {
            return None;
        }
        Some((length.trailing_zeros() - inner.min_class.trailing_zeros()) as usize)
    }
}

impl<T: Copy + Default> ArrayPool<T> {
    /// Resizes `source` to `minimum` items.
    ///
    /// Without a source this is `allocate`. When the source already has
    /// exactly `minimum` items it is returned untouched. Otherwise a new array
    /// is allocated, the first `min(used, minimum)` items are copied over and
    /// the source is recycled.
    pub fn reallocate(&self, source: Option<Box<[T]>>, used: usize, minimum: usize) -> Box<[T]> {
        let Some(source) = source else {
            return self.allocate(minimum);
        };

        if source.len() == minimum {
            return source;
        }

        let mut target = self.allocate(minimum);
        let copied = used.min(minimum).min(source.len()).min(target.len());
        target[..copied].copy_from_slice(&source[..copied]);
        self.recycle(source);

        target
    }
}

fn fresh<T: Default>(size: usize) -> Box<[T]> {
    std::iter::repeat_with(T::default).take(size).collect()
}
