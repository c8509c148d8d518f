//! Large chunked buffer example.
//!
//! Shows the migration from a single block to chunks, and private pools.
//!
//! Run with:
//!     cargo run --example large_buffer

use poolbuf::{Buffer, BufferConfig, BufferPools, ChunkedBuffer, PoolConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Private pools keep at most 4 idle arrays per size class
    let pools = BufferPools::<u8>::with_config(PoolConfig::default().with_arrays_per_bucket(4))?;
    let config = BufferConfig::new(16 * 1024, 64 * 1024, 1024 * 1024)?;
    let mut buffer = ChunkedBuffer::with_pools(pools.clone(), config)?;

    let block = vec![0x5Au8; 8 * 1024];
    for step in 1..=64u32 {
        buffer.write(&block)?;
        if step.is_power_of_two() {
            println!(
                "{:>9} bytes  capacity {:>9}  chunked {:<5}  chunks {}",
                buffer.len(),
                buffer.capacity(),
                buffer.is_chunked(),
                buffer.chunk_count()
            );
        }
    }

    let sizes: Vec<usize> = buffer.slices().map(<[u8]>::len).collect();
    println!("\nChunk fill: {:?}", sizes);

    buffer.set_len(100_000)?;
    println!(
        "After truncating to {} bytes: {} chunks, {} idle arrays in the pool",
        buffer.len(),
        buffer.chunk_count(),
        pools.items.retained()
    );

    buffer.dispose();
    println!("After dispose: {} idle arrays in the pool", pools.items.retained());
    println!("Trimmed {} arrays", pools.items.trim());

    Ok(())
}
