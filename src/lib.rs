//! poolbuf
//!
//! Growable in-memory buffers backed by pooled arrays.
//!
//! `poolbuf` provides memory-stream-like buffers whose storage is rented
//! from a shared pool and returned to it when the buffer shrinks, is cleared
//! or is dropped. It is meant for hot paths that would otherwise allocate a
//! fresh `Vec` per request:
//!
//! - serializing messages before sending them
//! - staging uploads and downloads
//! - building large text documents
//!
//! Two buffer kinds share one [`Buffer`] trait:
//!
//! - [`ResizingBuffer`] keeps everything in one array, so the content can be
//!   borrowed as a single slice
//! - [`ChunkedBuffer`] switches to a list of chunks once it grows large,
//!   avoiding huge reallocations and the single array size limit
//!
//! The crate intentionally:
//! - does NOT synchronize access to a buffer
//! - does NOT persist or memory-map anything
//! - does NOT transform the data (no compression, no encryption)
//!
//! # Buffers
//!
//! ```
//! use poolbuf::{Buffer, ChunkedBuffer};
//!
//! let mut buffer = ChunkedBuffer::<u8>::new();
//! buffer.write(b"hello world")?;
//! buffer.set_position(0)?;
//!
//! let mut head = [0u8; 5];
//! buffer.read(&mut head);
//! assert_eq!(&head, b"hello");
//! # Ok::<(), poolbuf::BufferError>(())
//! ```
//!
//! # Streams and text
//!
//! ```
//! use std::io::Write;
//! use poolbuf::{ChunkedByteStream, ResizingTextWriter};
//!
//! let mut stream = ChunkedByteStream::default();
//! stream.write_all(b"bytes")?;
//! assert_eq!(stream.len(), 5);
//!
//! let mut writer = ResizingTextWriter::default();
//! writer.write_line("text")?;
//! assert_eq!(writer.as_bytes()?, b"text\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Async (feature = "async-io")
//!
//! [`BufferStream`] implements the `futures-io` traits, completing every
//! poll immediately.
//!
//! ```ignore
//! use futures_util::io::AsyncWriteExt;
//! use poolbuf::ChunkedByteStream;
//!
//! async fn demo() -> std::io::Result<()> {
//!     let mut stream = ChunkedByteStream::default();
//!     stream.write_all(b"async").await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod config;
mod error;
mod pool;
mod stream;
mod text;

mod util; // internal (pooled chunk index)

//
// Public surface
//

pub use buffer::{Buffer, Chunk, ChunkedBuffer, MAX_BUFFER_LENGTH, ResizingBuffer};
pub use config::{BufferConfig, PoolConfig};
pub use error::BufferError;
pub use pool::{
    ArrayPool, BufferPools, Item, MAX_ARRAY_ITEMS, MIN_ALLOCATED_SIZE_BYTES,
    OPTIMAL_POOLED_SIZE_BYTES, SAFE_ARRAY_ITEMS,
};
pub use stream::{BufferStream, ChunkedByteStream, ResizingByteStream};
pub use text::{
    ChunkedStringBuffer, ChunkedTextWriter, ResizingStringBuffer, ResizingTextWriter,
    StringBuffer, TextEncoding, TextWriter,
};
