//! Minimal growable list over pooled storage.

use std::ops::{Index, IndexMut};

use crate::pool::ArrayPool;

/// Smallest capacity floor a list will use.
const MIN_CAPACITY: usize = 4;

/// Ordered list whose backing array is rented from an [`ArrayPool`].
///
/// Only what the chunk index needs: push, truncate and indexed access by
/// reference. Slots past `len` always hold `E::default()`, so the backing
/// array never keeps values alive after they were removed.
pub(crate) struct PooledList<E: Default> {
    pool: ArrayPool<E>,
    data: Box<[E]>,
    count: usize,
    capacity0: usize,
}

impl<E: Default> PooledList<E> {
    /// Creates an empty list with at least `capacity0` slots pre-allocated.
    pub(crate) fn with_capacity(pool: ArrayPool<E>, capacity0: usize) -> Self {
        let capacity0 = capacity0.max(MIN_CAPACITY);
        let data = pool.allocate(capacity0);
        Self {
            pool,
            data,
            count: 0,
            capacity0,
        }
    }

    /// Number of items in the list.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&E> {
        self.as_slice().get(index)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        let count = self.count;
        self.data[..count].get_mut(index)
    }

    #[inline]
    pub(crate) fn last(&self) -> Option<&E> {
        self.as_slice().last()
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[E] {
        &self.data[..self.count]
    }

    /// Appends an item, growing the backing array if it is full.
    pub(crate) fn push(&mut self, item: E) {
        if self.count == self.data.len() {
            self.reallocate(self.count + 1);
        }

        self.data[self.count] = item;
        self.count += 1;
    }

    /// Drops all items at and after `index`.
    ///
    /// Reallocates to a smaller array once usage falls below half of the
    /// capacity, but never below the initial capacity.
    pub(crate) fn truncate(&mut self, index: usize) {
        if index >= self.count {
            return;
        }

        for slot in &mut self.data[index..self.count] {
            *slot = E::default();
        }
        self.count = index;

        let capacity = self.data.len();
        if self.count < capacity >> 1 && capacity > self.capacity0 {
            self.reallocate(self.count);
        }
    }

    fn reallocate(&mut self, count: usize) {
        let capacity = count.next_power_of_two().max(self.capacity0);
        if capacity == self.data.len() {
            return;
        }

        let mut target = self.pool.allocate(capacity);
        let used = self.count;
        target[..used].swap_with_slice(&mut self.data[..used]);
        let source = std::mem::replace(&mut self.data, target);
        self.pool.recycle(source);
    }
}

impl<E: Default> Index<usize> for PooledList<E> {
    type Output = E;

    #[inline]
    fn index(&self, index: usize) -> &E {
        &self.as_slice()[index]
    }
}

impl<E: Default> IndexMut<usize> for PooledList<E> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut E {
        let count = self.count;
        &mut self.data[..count][index]
    }
}

impl<E: Default> Drop for PooledList<E> {
    fn drop(&mut self) {
        for slot in &mut self.data[..self.count] {
            *slot = E::default();
        }
        self.count = 0;
        let data = std::mem::take(&mut self.data);
        self.pool.recycle(data);
    }
}
