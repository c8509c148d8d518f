//! Array pooling.
//!
//! Buffers never allocate their storage directly. They rent arrays from an
//! [`ArrayPool`] and give them back when they shrink, migrate or are dropped,
//! so a process that keeps creating and discarding buffers keeps reusing the
//! same memory.
//!
//! - [`ArrayPool`] - Shared pool of arrays bucketed by power-of-two size
//! - [`BufferPools`] - The pair of pools a buffer draws from
//! - [`Item`] - Element types, each with its process-wide pools

mod array_pool;
mod item;

pub use array_pool::{
    ArrayPool, MAX_ARRAY_ITEMS, MIN_ALLOCATED_SIZE_BYTES, OPTIMAL_POOLED_SIZE_BYTES,
    SAFE_ARRAY_ITEMS,
};
pub use item::{BufferPools, Item};
