//! Internal utility functions and helpers.
//!
//! This module contains small helpers used throughout the crate and the
//! pooled list backing the chunk index. It is an implementation detail and
//! not part of the public API.

mod pooled_list;

pub(crate) use pooled_list::PooledList;

/// Converts a size in bytes into a number of `T` items (at least one).
#[inline]
pub(crate) const fn items_in<T>(bytes: usize) -> usize {
    let size = std::mem::size_of::<T>();
    let items = if size == 0 { bytes } else { bytes / size };
    if items == 0 { 1 } else { items }
}

/// Largest power of two not greater than `value` (0 for 0).
#[inline]
pub(crate) const fn round_down_pow2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - value.leading_zeros())
    }
}
