#![no_main]

use std::io::{Read, Seek, SeekFrom, Write};

use libfuzzer_sys::fuzz_target;
use poolbuf::{BufferConfig, BufferPools, BufferStream, ChunkedBuffer, ResizingByteStream};

fuzz_target!(|data: Vec<u8>| {
    // Piece size comes from the first byte so writes cross chunk boundaries
    // at varying offsets
    let piece = data.first().map_or(1, |b| *b as usize + 1);

    let configs = [
        BufferConfig::new(256, 256, 256).unwrap(),
        BufferConfig::new(1024, 256, 4096).unwrap(),
        BufferConfig::default().with_chunk_mode(true),
    ];

    for config in configs {
        let buffer = ChunkedBuffer::with_pools(BufferPools::new(), config).unwrap();
        let mut stream = BufferStream::new(buffer);
        for part in data.chunks(piece) {
            stream.write_all(part).unwrap();
        }
        assert_eq!(stream.len(), data.len() as u64);

        stream.seek(SeekFrom::Start(0)).unwrap();
        let mut copy = Vec::new();
        stream.read_to_end(&mut copy).unwrap();
        assert_eq!(copy, data);
        assert_eq!(stream.to_bytes(), data);
    }

    let mut stream = ResizingByteStream::default();
    stream.write_all(&data).unwrap();
    assert_eq!(stream.as_slice(), &data[..]);
});
