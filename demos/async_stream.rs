//! Async stream example (feature = "async-io").
//!
//! A pooled buffer used as a `futures-io` reader and writer.
//!
//! Run with:
//!     cargo run --example async_stream --features async-io

use std::io::SeekFrom;

use futures_util::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use poolbuf::ChunkedByteStream;

fn main() -> std::io::Result<()> {
    tokio_test::block_on(async {
        let mut stream = ChunkedByteStream::default();

        for i in 0..1_000 {
            let line = format!("event {}\n", i);
            stream.write_all(line.as_bytes()).await?;
        }
        stream.flush().await?;
        println!("Wrote {} bytes", stream.len());

        stream.seek(SeekFrom::End(-10)).await?;
        let mut tail = String::new();
        stream.read_to_string(&mut tail).await?;
        println!("Tail: {:?}", tail);

        Ok(())
    })
}
