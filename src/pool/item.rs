//! Element types and their process-wide pools.

use std::sync::OnceLock;

use crate::buffer::Chunk;
use crate::config::PoolConfig;
use crate::error::BufferError;

use super::ArrayPool;

/// The pools a buffer of `T` draws from: one for item arrays and one for
/// the chunk index of a chunked buffer.
pub struct BufferPools<T> {
    /// Pool of item arrays (block0 and chunks).
    pub items: ArrayPool<T>,
    /// Pool of chunk index slots.
    pub chunks: ArrayPool<Option<Chunk<T>>>,
}

impl<T> Clone for BufferPools<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            chunks: self.chunks.clone(),
        }
    }
}

impl<T> std::fmt::Debug for BufferPools<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPools")
            .field("items", &self.items)
            .field("chunks", &self.chunks)
            .finish()
    }
}

impl<T: Item> Default for BufferPools<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> BufferPools<T> {
    /// Creates a private set of pools with the default configuration.
    ///
    /// Useful to isolate a component (or a test) from the shared pools.
    pub fn new() -> Self {
        Self {
            items: ArrayPool::new(),
            chunks: ArrayPool::new(),
        }
    }

    /// Creates a private set of pools, both using `config`.
    pub fn with_config(config: PoolConfig) -> Result<Self, BufferError> {
        Ok(Self {
            items: ArrayPool::with_config(config)?,
            chunks: ArrayPool::with_config(config)?,
        })
    }

    /// The process-wide pools of `T`.
    pub fn shared() -> Self {
        T::shared_pools().clone()
    }
}

/// Element types a buffer can hold.
///
/// Items are small `Copy` values with a fixed layout. Each item type owns a
/// set of process-wide pools, created on first use and never torn down.
pub trait Item: Copy + Default + Send + Sync + 'static {
    /// The process-wide pools for this item type.
    fn shared_pools() -> &'static BufferPools<Self>;
}

macro_rules! impl_item {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Item for $ty {
                fn shared_pools() -> &'static BufferPools<Self> {
                    static POOLS: OnceLock<BufferPools<$ty>> = OnceLock::new();
                    POOLS.get_or_init(BufferPools::new)
                }
            }
        )*
    };
}

impl_item!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, char);
