//! Basic byte stream example.
//!
//! Run with:
//!     cargo run --example stream_basic

use std::io::{Read, Seek, SeekFrom, Write};

use poolbuf::{Buffer, BufferPools, ChunkedByteStream, ResizingByteStream};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A small stream: everything stays in one pooled array
    let mut small = ResizingByteStream::default();
    writeln!(small, "request id: {}", 42)?;
    writeln!(small, "payload: {:?}", [1, 2, 3])?;

    println!("Small stream ({} bytes):", small.len());
    print!("{}", String::from_utf8_lossy(small.as_slice()));

    // A larger stream: seek around like a file
    let mut stream = ChunkedByteStream::default();
    for i in 0..100_000u32 {
        stream.write_all(&i.to_le_bytes())?;
    }

    stream.seek(SeekFrom::Start(4 * 77_777))?;
    let mut word = [0u8; 4];
    stream.read_exact(&mut word)?;
    println!(
        "\nLarge stream: {} bytes in {} chunks, item 77777 = {}",
        stream.len(),
        stream.get_ref().chunk_count(),
        u32::from_le_bytes(word)
    );

    // Dropping a buffer hands its storage back to the shared pool
    let buffer = stream.into_inner();
    let capacity = buffer.capacity();
    drop(buffer);
    println!(
        "Returned {} bytes of capacity; the u8 pool now holds {} idle arrays",
        capacity,
        BufferPools::<u8>::shared().items.retained()
    );

    Ok(())
}

