// Integration tests for the buffer API
// Tests cover: round trips across the migration boundary, cursor
// semantics, truncate/extend, growth, and the io::Cursor reference scenario

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use poolbuf::{
    ArrayPool, Buffer, BufferConfig, BufferPools, ChunkedBuffer, MAX_ARRAY_ITEMS, ResizingBuffer,
};

fn pattern(length: usize, seed: u64) -> Vec<u8> {
    let mut state = seed | 1;
    (0..length)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state as u8
        })
        .collect()
}

fn small_config() -> BufferConfig {
    BufferConfig::new(4 * 1024, 4 * 1024, 64 * 1024).unwrap()
}

fn resizing() -> ResizingBuffer<u8> {
    ResizingBuffer::with_pool(ArrayPool::new())
}

fn chunked() -> ChunkedBuffer<u8> {
    ChunkedBuffer::with_pools(BufferPools::new(), BufferConfig::default()).unwrap()
}

fn chunked_small() -> ChunkedBuffer<u8> {
    ChunkedBuffer::with_pools(BufferPools::new(), small_config()).unwrap()
}

fn chunked_only() -> ChunkedBuffer<u8> {
    ChunkedBuffer::with_pools(BufferPools::new(), small_config().with_chunk_mode(true)).unwrap()
}

fn read_all<B: Buffer<u8>>(buffer: &mut B) -> Vec<u8> {
    buffer.set_position(0).unwrap();
    let mut target = vec![0u8; buffer.len() as usize + 7];
    let read = buffer.read(&mut target);
    target.truncate(read);
    target
}

// ============================================================================
// Round Trip Tests
// ============================================================================

fn check_round_trip<B: Buffer<u8>>(mut buffer: B, length: usize) {
    let data = pattern(length, length as u64);
    assert_eq!(buffer.write(&data).unwrap(), length);
    assert_eq!(buffer.len(), length as u64);
    assert_eq!(buffer.position(), length as u64);
    assert!(buffer.capacity() >= buffer.len());

    assert_eq!(read_all(&mut buffer), data, "read back {} bytes", length);
    assert_eq!(buffer.to_vec(), data, "export {} bytes", length);
}

#[test]
fn test_round_trip_all_variants() {
    for length in [0, 1, 255, 256, 257, 4095, 4096, 4097, 100_000, 1_000_000] {
        check_round_trip(resizing(), length);
        check_round_trip(chunked(), length);
        check_round_trip(chunked_small(), length);
        check_round_trip(chunked_only(), length);
    }
}

#[test]
fn test_round_trip_in_small_writes() {
    let data = pattern(50_000, 3);
    let mut buffer = chunked_small();
    for piece in data.chunks(333) {
        buffer.write(piece).unwrap();
    }
    assert!(buffer.is_chunked());
    assert_eq!(read_all(&mut buffer), data);

    // read back in small pieces too
    buffer.set_position(0).unwrap();
    let mut copy = Vec::new();
    let mut piece = [0u8; 777];
    loop {
        let read = buffer.read(&mut piece);
        if read == 0 {
            break;
        }
        copy.extend_from_slice(&piece[..read]);
    }
    assert_eq!(copy, data);
}

// ============================================================================
// Cursor Semantics Tests
// ============================================================================

fn check_random_access<B: Buffer<u8>>(mut buffer: B) {
    let data = pattern(200_000, 11);
    buffer.write(&data).unwrap();

    let mut offsets = pattern(64, 5).into_iter();
    for step in 0..64u64 {
        let offset = (step * 3119 + offsets.next().unwrap_or(0) as u64) % data.len() as u64;
        assert_eq!(buffer.set_position(offset).unwrap(), offset);

        let mut target = [0u8; 300];
        let read = buffer.read(&mut target);
        let expected = &data[offset as usize..(offset as usize + 300).min(data.len())];
        assert_eq!(&target[..read], expected, "read at {}", offset);
        assert_eq!(buffer.position(), offset + read as u64);
    }
}

#[test]
fn test_random_access() {
    check_random_access(resizing());
    check_random_access(chunked());
    check_random_access(chunked_small());
    check_random_access(chunked_only());
}

fn check_overwrite<B: Buffer<u8>>(mut buffer: B) {
    let mut model = pattern(30_000, 9);
    buffer.write(&model).unwrap();

    let patch = vec![0xEEu8; 10_000];
    buffer.set_position(12_345).unwrap();
    buffer.write(&patch).unwrap();
    model[12_345..22_345].copy_from_slice(&patch);

    assert_eq!(buffer.len(), 30_000);
    assert_eq!(buffer.position(), 22_345);
    assert_eq!(buffer.to_vec(), model);

    // overwrite past the end extends the buffer
    buffer.set_position(29_000).unwrap();
    buffer.write(&patch).unwrap();
    model.truncate(29_000);
    model.extend_from_slice(&patch);
    assert_eq!(buffer.len(), 39_000);
    assert_eq!(buffer.to_vec(), model);
}

#[test]
fn test_overwrite() {
    check_overwrite(resizing());
    check_overwrite(chunked_small());
    check_overwrite(chunked_only());
}

#[test]
fn test_position_is_clamped() {
    let mut buffer = chunked_small();
    buffer.write(&pattern(10_000, 1)).unwrap();
    assert_eq!(buffer.set_position(10_000).unwrap(), 10_000);
    assert_eq!(buffer.set_position(u64::MAX).unwrap(), 10_000);
    assert_eq!(buffer.read(&mut [0u8; 10]), 0);
}

#[test]
fn test_export_into_short_target() {
    let data = pattern(20_000, 2);
    let mut buffer = chunked_small();
    buffer.write(&data).unwrap();

    let mut target = vec![0u8; 5_000];
    assert_eq!(buffer.export_to(&mut target), 5_000);
    assert_eq!(target, data[..5_000]);
    // export does not move the cursor
    assert_eq!(buffer.position(), 20_000);
}

// ============================================================================
// Length Tests
// ============================================================================

fn check_truncate_extend<B: Buffer<u8>>(mut buffer: B) {
    let data = pattern(100_000, 4);
    buffer.write(&data).unwrap();

    // truncate
    buffer.set_len(1_000).unwrap();
    assert_eq!(buffer.len(), 1_000);
    assert_eq!(buffer.position(), 1_000);
    assert_eq!(buffer.to_vec(), data[..1_000]);

    // truncating to the same length changes nothing
    let state = (buffer.len(), buffer.capacity(), buffer.position());
    buffer.set_len(1_000).unwrap();
    assert_eq!((buffer.len(), buffer.capacity(), buffer.position()), state);

    // extend keeps the prefix and the cursor
    buffer.set_len(50_000).unwrap();
    assert_eq!(buffer.len(), 50_000);
    assert_eq!(buffer.position(), 1_000);
    assert_eq!(buffer.to_vec()[..1_000], data[..1_000]);

    // zero releases everything
    buffer.set_len(0).unwrap();
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.capacity(), 0);
    assert_eq!(buffer.position(), 0);
}

#[test]
fn test_truncate_extend() {
    check_truncate_extend(resizing());
    check_truncate_extend(chunked());
    check_truncate_extend(chunked_small());
    check_truncate_extend(chunked_only());
}

fn check_growth_is_monotonic<B: Buffer<u8>>(mut buffer: B) {
    let mut capacity = 0;
    for length in (0..200_000u64).step_by(1_733) {
        buffer.set_len(length).unwrap_or_else(|e| panic!("set_len({}): {}", length, e));
        assert!(buffer.capacity() >= capacity, "capacity went down at {}", length);
        assert!(buffer.capacity() >= length);
        capacity = buffer.capacity();
    }
}

#[test]
fn test_growth_is_monotonic() {
    check_growth_is_monotonic(resizing());
    check_growth_is_monotonic(chunked());
    check_growth_is_monotonic(chunked_small());
}

#[test]
fn test_capacity_limits() {
    let mut buffer = resizing();
    assert!(buffer.set_len(MAX_ARRAY_ITEMS as u64 + 1).is_err());
    assert_eq!(buffer.len(), 0);

    let mut buffer = chunked_small();
    assert!(buffer.set_len(u64::MAX).is_err());
    buffer.write(b"still usable").unwrap();
    assert_eq!(buffer.to_vec(), b"still usable");
}

// ============================================================================
// Reference Scenario Tests
// ============================================================================

fn check_against_cursor<B: Buffer<u8>>(mut buffer: B) {
    let length = 1337 * 1024 + 1337;
    let data = pattern(length, 1337);
    let mut cursor = Cursor::new(Vec::new());

    buffer.write(&data).unwrap();
    cursor.write_all(&data).unwrap();
    assert_eq!(buffer.len(), cursor.get_ref().len() as u64);

    buffer.set_len(16).unwrap();
    cursor.get_mut().truncate(16);
    cursor.seek(SeekFrom::Start(16)).unwrap();
    assert_eq!(buffer.position(), 16);

    buffer.write(&data).unwrap();
    cursor.write_all(&data).unwrap();

    let expected = (length + 16) as u64;
    assert_eq!(buffer.len(), expected);
    assert_eq!(buffer.position(), expected);
    assert_eq!(cursor.position(), expected);

    let mut model = Vec::new();
    cursor.set_position(0);
    cursor.read_to_end(&mut model).unwrap();
    let exported = buffer.to_vec();
    assert_eq!(exported, model);
    assert_eq!(exported[16..], data[..]);
}

#[test]
fn test_matches_io_cursor() {
    check_against_cursor(resizing());
    check_against_cursor(chunked());
    check_against_cursor(chunked_small());
    check_against_cursor(chunked_only());
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[test]
fn test_storage_is_returned_and_reused() {
    let pools = BufferPools::<u8>::new();
    let config = small_config();

    {
        let mut buffer = ChunkedBuffer::with_pools(pools.clone(), config).unwrap();
        buffer.write(&pattern(100_000, 6)).unwrap();
        assert_eq!(pools.items.retained(), 0);
    }
    let retained = pools.items.retained();
    assert!(retained > 0);

    // a second buffer of the same shape takes everything back out
    let mut buffer = ChunkedBuffer::with_pools(pools.clone(), config).unwrap();
    buffer.write(&pattern(100_000, 7)).unwrap();
    assert_eq!(pools.items.retained(), 0);

    buffer.dispose();
    assert_eq!(pools.items.retained(), retained);
    assert_eq!(buffer.len(), 0);
}

#[test]
fn test_other_item_types() {
    let mut words = ChunkedBuffer::<u32>::new();
    let data: Vec<u32> = (0..100_000).collect();
    words.write(&data).unwrap();
    assert!(words.is_chunked());
    assert_eq!(words.to_vec(), data);

    let mut floats = ResizingBuffer::<f64>::new();
    floats.write(&[1.5, 2.5, 3.5]).unwrap();
    assert_eq!(floats.peek(), &[1.5, 2.5, 3.5]);
}
