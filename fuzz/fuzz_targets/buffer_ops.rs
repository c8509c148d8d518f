#![no_main]

use libfuzzer_sys::fuzz_target;
use poolbuf::{ArrayPool, Buffer, BufferConfig, BufferPools, ChunkedBuffer, ResizingBuffer};

// Interprets the input as an operation script and runs it against both
// buffer kinds, checking them against a Vec model after every step.
fuzz_target!(|data: &[u8]| {
    let config = BufferConfig::new(256, 256, 1024).unwrap();
    let mut chunked = ChunkedBuffer::with_pools(BufferPools::new(), config).unwrap();
    let mut resizing = ResizingBuffer::with_pool(ArrayPool::new());

    // None marks items exposed by growing the length (unspecified contents)
    let mut model: Vec<Option<u8>> = Vec::new();
    let mut position = 0usize;

    for op in data.chunks(3) {
        let [kind, a, b] = [op[0], *op.get(1).unwrap_or(&0), *op.get(2).unwrap_or(&0)];
        let amount = u16::from_le_bytes([a, b]) as usize;

        match kind % 5 {
            0 => {
                let source: Vec<u8> = (0..amount).map(|i| (i as u8) ^ kind).collect();
                assert_eq!(chunked.write(&source).unwrap(), amount);
                assert_eq!(resizing.write(&source).unwrap(), amount);
                let end = position + amount;
                if end > model.len() {
                    model.resize(end, None);
                }
                for (slot, byte) in model[position..end].iter_mut().zip(source) {
                    *slot = Some(byte);
                }
                position = end;
            }
            1 => {
                let mut left = vec![0u8; amount];
                let mut right = vec![0u8; amount];
                let read = chunked.read(&mut left);
                assert_eq!(resizing.read(&mut right), read);
                assert_eq!(read, amount.min(model.len() - position));
                for (index, expected) in model[position..position + read].iter().enumerate() {
                    if let Some(expected) = expected {
                        assert_eq!(left[index], *expected);
                        assert_eq!(right[index], *expected);
                    }
                }
                position += read;
            }
            2 => {
                position = amount.min(model.len());
                assert_eq!(chunked.set_position(amount as u64).unwrap(), position as u64);
                assert_eq!(resizing.set_position(amount as u64).unwrap(), position as u64);
            }
            3 => {
                chunked.set_len(amount as u64).unwrap();
                resizing.set_len(amount as u64).unwrap();
                model.resize(amount, None);
                position = position.min(amount);
            }
            _ => {
                chunked.clear();
                resizing.clear();
                model.clear();
                position = 0;
            }
        }

        for buffer_len in [chunked.len(), resizing.len()] {
            assert_eq!(buffer_len, model.len() as u64);
        }
        assert_eq!(chunked.position(), position as u64);
        assert_eq!(resizing.position(), position as u64);
        assert!(chunked.capacity() >= chunked.len());
        assert!(resizing.capacity() >= resizing.len());
    }

    let exported = chunked.to_vec();
    for (byte, expected) in exported.iter().zip(&model) {
        if let Some(expected) = expected {
            assert_eq!(byte, expected);
        }
    }
});
