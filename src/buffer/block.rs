//! Single pooled array storage ("block0").

use super::Extent;
use crate::error::BufferError;
use crate::pool::{ArrayPool, Item};

/// One pooled array plus the operations that keep `Extent` in sync with it.
///
/// The caller guarantees `extent.capacity == data.len()` (0 without data).
#[derive(Debug, Default)]
pub(crate) struct Block<T> {
    data: Option<Box<[T]>>,
}

impl<T: Item> Block<T> {
    /// Gives up the array, leaving the block empty.
    pub(crate) fn take(&mut self) -> Option<Box<[T]>> {
        self.data.take()
    }

    pub(crate) fn clear(&mut self, extent: &mut Extent, pool: &ArrayPool<T>) {
        if let Some(data) = self.data.take() {
            pool.recycle(data);
        }
        extent.reset();
    }

    pub(crate) fn expand(
        &mut self,
        extent: &mut Extent,
        pool: &ArrayPool<T>,
        length: u64,
    ) -> Result<u64, BufferError> {
        let expected = ArrayPool::<T>::rounded_size(length)?;
        self.resize(extent, pool, extent.length as usize, expected);
        extent.length = length;
        Ok(length)
    }

    pub(crate) fn shrink(
        &mut self,
        extent: &mut Extent,
        pool: &ArrayPool<T>,
        length: u64,
    ) -> Result<u64, BufferError> {
        if length < extent.position {
            extent.position = length;
        }

        // shrinking is a copy, so wait until a third of the capacity is left
        if length <= extent.capacity / 3 {
            let expected = ArrayPool::<T>::rounded_size(length)?;
            self.resize(extent, pool, length as usize, expected);
            tracing::trace!(length, capacity = extent.capacity, "block shrunk");
        }

        extent.length = length;
        Ok(length)
    }

    fn resize(&mut self, extent: &mut Extent, pool: &ArrayPool<T>, used: usize, expected: usize) {
        let block = pool.reallocate(self.data.take(), used, expected);
        extent.capacity = block.len() as u64;
        self.data = Some(block);
    }

    pub(crate) fn read(&self, extent: &mut Extent, target: &mut [T]) -> usize {
        let source = self.readable(extent);
        let length = source.len().min(target.len());
        target[..length].copy_from_slice(&source[..length]);
        extent.position += length as u64;
        length
    }

    /// Copies `source` at the cursor. Capacity must already cover it.
    pub(crate) fn write(&mut self, extent: &mut Extent, source: &[T]) -> usize {
        if source.is_empty() {
            return 0;
        }

        let start = extent.position as usize;
        let length = source.len();
        if let Some(data) = self.data.as_deref_mut() {
            data[start..start + length].copy_from_slice(source);
        }
        extent.position += length as u64;
        length
    }

    pub(crate) fn export_to(&self, extent: &Extent, target: &mut [T]) -> usize {
        let source = self.peek(extent);
        let length = source.len().min(target.len());
        target[..length].copy_from_slice(&source[..length]);
        length
    }

    pub(crate) fn peek(&self, extent: &Extent) -> &[T] {
        match self.data.as_deref() {
            Some(data) => &data[..extent.length as usize],
            None => &[],
        }
    }

    pub(crate) fn peek_mut(&mut self, extent: &Extent) -> &mut [T] {
        match self.data.as_deref_mut() {
            Some(data) => &mut data[..extent.length as usize],
            None => &mut [],
        }
    }

    fn readable(&self, extent: &Extent) -> &[T] {
        &self.peek(extent)[extent.position as usize..]
    }
}
