//! Chunk index of a chunked buffer.
//!
//! Chunks partition `[0, capacity)`: every chunk starts where the previous
//! one ends. The index is only ever appended to or truncated from the tail,
//! which keeps that true without checking it. The locator relies on it for
//! binary search, and reports [`BufferError::Corrupted`] if it ever finds a
//! gap.

use super::Extent;
use crate::error::BufferError;
use crate::pool::{ArrayPool, BufferPools, Item, MIN_ALLOCATED_SIZE_BYTES};
use crate::util::PooledList;

/// Below this many chunks a backward scan beats binary search.
const BINARY_SEARCH_THRESHOLD: usize = 8;

/// One pooled array and the logical offset of its first item.
#[derive(Debug)]
pub struct Chunk<T> {
    data: Box<[T]>,
    start: u64,
}

impl<T> Chunk<T> {
    /// Logical offset of the first item.
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Number of items backed by this chunk.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no storage.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Logical offset one past the last item.
    #[inline]
    pub fn end(&self) -> u64 {
        self.start + self.data.len() as u64
    }

    /// Whether `position` falls in `[start, end]`.
    ///
    /// The end is included so a cursor sitting at the end of a chunk (right
    /// after a write filled it) still resolves to that chunk.
    #[inline]
    fn contains(&self, position: u64) -> bool {
        position.wrapping_sub(self.start) <= self.data.len() as u64
    }

    /// Items from `position` to the end of the chunk.
    #[inline]
    fn span_at(&self, position: u64) -> &[T] {
        let offset = position.saturating_sub(self.start) as usize;
        self.data.get(offset..).unwrap_or(&[])
    }

    #[inline]
    fn span_at_mut(&mut self, position: u64) -> &mut [T] {
        let offset = position.saturating_sub(self.start) as usize;
        self.data.get_mut(offset..).unwrap_or(&mut [])
    }
}

/// The chunk list plus the cached index of the chunk holding the cursor.
pub(crate) struct Chunks<T: Item> {
    list: PooledList<Option<Chunk<T>>>,
    index: usize,
}

impl<T: Item> Chunks<T> {
    /// Creates the index, adopting `block0` as the first chunk.
    pub(crate) fn new(pools: &BufferPools<T>, block0: Option<Box<[T]>>) -> Self {
        let slot = std::mem::size_of::<Option<Chunk<T>>>().max(1);
        let mut list =
            PooledList::with_capacity(pools.chunks.clone(), MIN_ALLOCATED_SIZE_BYTES / slot);

        if let Some(data) = block0 {
            tracing::debug!(capacity = data.len(), "moving block into chunk index");
            list.push(Some(Chunk { data, start: 0 }));
        }

        Self { list, index: 0 }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    fn chunk(&self, index: usize) -> Option<&Chunk<T>> {
        self.list.get(index).and_then(Option::as_ref)
    }

    #[inline]
    fn chunk_mut(&mut self, index: usize) -> Option<&mut Chunk<T>> {
        self.list.get_mut(index).and_then(Option::as_mut)
    }

    /// Moves the cursor to `position`, which must be within `[0, length]`.
    pub(crate) fn seek(&mut self, extent: &mut Extent, position: u64) -> Result<u64, BufferError> {
        let count = self.list.len();

        if position == 0 {
            self.index = 0;
            extent.position = 0;
            return Ok(0);
        }

        if position >= extent.length {
            // the end of data may sit at the very end of the last chunk,
            // where no chunk strictly contains it
            self.index = count.saturating_sub(1);
            extent.position = extent.length;
            return Ok(extent.length);
        }

        if self.chunk(self.index).is_some_and(|chunk| chunk.contains(position)) {
            extent.position = position;
            return Ok(position);
        }

        let index = if count >= BINARY_SEARCH_THRESHOLD {
            self.find_binary(position)
        } else {
            self.find_scan(position)
        };

        match index {
            Some(index) => {
                self.index = index;
                extent.position = position;
                Ok(position)
            }
            None => {
                tracing::error!(position, chunks = count, "chunk index does not cover position");
                Err(BufferError::Corrupted { position })
            }
        }
    }

    fn find_scan(&self, position: u64) -> Option<usize> {
        (0..self.list.len())
            .rev()
            .find(|&index| self.chunk(index).is_some_and(|chunk| chunk.contains(position)))
    }

    fn find_binary(&self, position: u64) -> Option<usize> {
        let mut lo = 0;
        let mut hi = self.list.len();

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let chunk = self.chunk(mid)?;

            if chunk.contains(position) {
                return Some(mid);
            }

            if position < chunk.start {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }

        // chunks are contiguous and both ends are handled by the caller,
        // so reaching this point means the index was damaged
        None
    }

    pub(crate) fn clear(&mut self, extent: &mut Extent, pool: &ArrayPool<T>) {
        for index in 0..self.list.len() {
            if let Some(chunk) = self.list[index].take() {
                pool.recycle(chunk.data);
            }
        }
        self.list.truncate(0);
        self.index = 0;
        extent.reset();
    }

    /// Appends chunks until the capacity covers `length`.
    pub(crate) fn expand(
        &mut self,
        extent: &mut Extent,
        pool: &ArrayPool<T>,
        sizes: ChunkSizes,
        length: u64,
    ) -> u64 {
        let mut size = self.list.last().and_then(Option::as_ref).map_or(0, Chunk::len);
        let mut capacity = extent.capacity;

        while capacity < length {
            let data = pool.allocate(sizes.next(size));
            size = data.len();
            tracing::trace!(start = capacity, size, "chunk allocated");
            self.list.push(Some(Chunk {
                data,
                start: capacity,
            }));
            capacity += size as u64;
        }

        extent.capacity = capacity;
        extent.length = length;
        length
    }

    /// Recycles every chunk starting at or after `length`.
    pub(crate) fn shrink(&mut self, extent: &mut Extent, pool: &ArrayPool<T>, length: u64) -> u64 {
        let mut capacity = extent.capacity;
        let mut keep = self.list.len();

        while keep > 0 {
            let index = keep - 1;
            if self.chunk(index).is_some_and(|chunk| chunk.start < length) {
                break;
            }

            if let Some(chunk) = self.list[index].take() {
                capacity -= chunk.data.len() as u64;
                pool.recycle(chunk.data);
            }
            keep = index;
        }

        let released = self.list.len() - keep;
        self.list.truncate(keep);
        if released > 0 {
            tracing::trace!(released, capacity, "chunks released");
        }

        if extent.position >= length {
            extent.position = length;
            self.index = keep.saturating_sub(1);
        }

        extent.capacity = capacity;
        extent.length = length;
        length
    }

    /// Copies `source` at the cursor. Capacity must already cover it.
    pub(crate) fn write(&mut self, extent: &mut Extent, source: &[T]) -> Result<usize, BufferError> {
        let mut position = extent.position;
        let mut index = self.index;
        let mut written = 0;

        while written < source.len() {
            let Some(chunk) = self.chunk_mut(index) else {
                return Err(BufferError::Corrupted { position });
            };

            let target = chunk.span_at_mut(position);
            let length = target.len().min(source.len() - written);
            target[..length].copy_from_slice(&source[written..written + length]);
            written += length;
            position += length as u64;

            if written < source.len() {
                index += 1;
            }
        }

        self.index = index;
        extent.position = position;
        Ok(written)
    }

    pub(crate) fn read(&mut self, extent: &mut Extent, target: &mut [T]) -> usize {
        let total = (target.len() as u64).min(extent.remaining()) as usize;
        let mut position = extent.position;
        let mut index = self.index;
        let mut read = 0;

        while read < total {
            let Some(chunk) = self.chunk(index) else {
                break;
            };

            let source = chunk.span_at(position);
            let length = source.len().min(total - read);
            target[read..read + length].copy_from_slice(&source[..length]);
            read += length;
            position += length as u64;

            if read < total {
                index += 1;
            }
        }

        self.index = index;
        extent.position = position;
        read
    }

    pub(crate) fn export_to(&self, extent: &Extent, target: &mut [T]) -> usize {
        let mut exported = 0;
        for source in self.slices(extent) {
            if exported == target.len() {
                break;
            }
            let length = source.len().min(target.len() - exported);
            target[exported..exported + length].copy_from_slice(&source[..length]);
            exported += length;
        }
        exported
    }

    /// The written part of each chunk, in order.
    pub(crate) fn slices<'a>(&'a self, extent: &Extent) -> impl Iterator<Item = &'a [T]> + 'a {
        let length = extent.length;
        self.list
            .as_slice()
            .iter()
            .filter_map(Option::as_ref)
            .take_while(move |chunk| chunk.start < length)
            .map(move |chunk| {
                let used = (length - chunk.start).min(chunk.data.len() as u64) as usize;
                &chunk.data[..used]
            })
    }
}

/// Chunk sizing policy, in items.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkSizes {
    pub(crate) first: usize,
    pub(crate) max: usize,
}

impl ChunkSizes {
    /// Size of the chunk following one of `last` items: double it, then
    /// clamp into `[first, max]`.
    #[inline]
    pub(crate) fn next(&self, last: usize) -> usize {
        last.saturating_mul(2)
            .checked_next_power_of_two()
            .unwrap_or(self.max)
            .clamp(self.first, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes() -> ChunkSizes {
        ChunkSizes { first: 16, max: 64 }
    }

    fn chunks_with(lengths: &[u64]) -> (Chunks<u8>, Extent, BufferPools<u8>) {
        let pools = BufferPools::new();
        let mut chunks = Chunks::new(&pools, None);
        let mut extent = Extent::default();
        for &length in lengths {
            chunks.expand(&mut extent, &pools.items, sizes(), length);
        }
        (chunks, extent, pools)
    }

    #[test]
    fn test_next_chunk_size() {
        let sizes = sizes();
        assert_eq!(sizes.next(0), 16);
        assert_eq!(sizes.next(5), 16);
        assert_eq!(sizes.next(16), 32);
        assert_eq!(sizes.next(32), 64);
        assert_eq!(sizes.next(64), 64);
        assert_eq!(sizes.next(usize::MAX), 64);
    }

    #[test]
    fn test_contains_includes_end() {
        let chunk = Chunk {
            data: vec![0u8; 10].into_boxed_slice(),
            start: 10,
        };
        assert!(!chunk.contains(9));
        assert!(chunk.contains(10));
        assert!(chunk.contains(20));
        assert!(!chunk.contains(21));
        assert_eq!(chunk.span_at(15).len(), 5);
        assert!(chunk.span_at(20).is_empty());
    }

    #[test]
    fn test_expand_is_contiguous() {
        let (chunks, extent, _pools) = chunks_with(&[200]);
        assert_eq!(extent.length, 200);
        // 16 + 32 + 64 + 64 + 64
        assert_eq!(chunks.len(), 5);
        assert_eq!(extent.capacity, 240);

        let mut expected = 0;
        for index in 0..chunks.len() {
            let chunk = chunks.chunk(index).unwrap();
            assert_eq!(chunk.start(), expected);
            expected = chunk.end();
        }
        assert_eq!(expected, extent.capacity);
    }

    #[test]
    fn test_seek_scan_and_binary() {
        // 3 chunks: scan
        let (mut chunks, mut extent, _pools) = chunks_with(&[100]);
        assert!(chunks.len() < BINARY_SEARCH_THRESHOLD);
        chunks.seek(&mut extent, 20).unwrap();
        assert!(chunks.chunk(chunks.index).unwrap().contains(20));

        // 20 chunks: binary search
        let (mut chunks, mut extent, _pools) = chunks_with(&[1200]);
        assert!(chunks.len() >= BINARY_SEARCH_THRESHOLD);
        for position in [1, 15, 16, 17, 500, 1000, 1199] {
            chunks.seek(&mut extent, position).unwrap();
            assert_eq!(extent.position, position);
            assert!(chunks.chunk(chunks.index).unwrap().contains(position));
        }
    }

    #[test]
    fn test_seek_ends() {
        let (mut chunks, mut extent, _pools) = chunks_with(&[1200]);
        chunks.seek(&mut extent, 0).unwrap();
        assert_eq!(chunks.index, 0);

        chunks.seek(&mut extent, 5000).unwrap();
        assert_eq!(extent.position, 1200);
        assert_eq!(chunks.index, chunks.len() - 1);
    }

    #[test]
    fn test_seek_detects_gap() {
        let (mut chunks, mut extent, _pools) = chunks_with(&[1200]);
        // break contiguity by moving a chunk far away
        if let Some(chunk) = chunks.chunk_mut(10) {
            chunk.start += 10_000;
        }
        let target = chunks.chunk(10).unwrap().start() - 10_000 + 1;
        chunks.index = 0;
        assert_eq!(
            chunks.seek(&mut extent, target),
            Err(BufferError::Corrupted { position: target })
        );
    }

    #[test]
    fn test_shrink_releases_tail() {
        let (mut chunks, mut extent, pools) = chunks_with(&[200]);
        extent.position = 200;

        chunks.shrink(&mut extent, &pools.items, 20);
        // chunks start at 0, 16, 48, ...: only the first two remain
        assert_eq!(chunks.len(), 2);
        assert_eq!(extent.capacity, 48);
        assert_eq!(extent.length, 20);
        assert_eq!(extent.position, 20);
        assert_eq!(chunks.index, 1);
    }

    #[test]
    fn test_write_read_across_chunks() {
        let (mut chunks, mut extent, _pools) = chunks_with(&[100]);
        let data: Vec<u8> = (0..100).collect();
        assert_eq!(chunks.write(&mut extent, &data).unwrap(), 100);
        assert_eq!(extent.position, 100);

        chunks.seek(&mut extent, 10).unwrap();
        let mut target = [0u8; 50];
        assert_eq!(chunks.read(&mut extent, &mut target), 50);
        assert_eq!(&target[..], &data[10..60]);

        let mut all = [0u8; 128];
        assert_eq!(chunks.export_to(&extent, &mut all), 100);
        assert_eq!(&all[..100], &data[..]);

        let lengths: Vec<usize> = chunks.slices(&extent).map(<[u8]>::len).collect();
        assert_eq!(lengths, vec![16, 32, 52]);
    }
}
