//! Byte stream adapter over a buffer.
//!
//! - [`BufferStream`] - `std::io` (and, with `async-io`, `futures-io`) view of
//!   any byte [`Buffer`]
//! - [`ResizingByteStream`] / [`ChunkedByteStream`] - The two concrete streams

#[cfg(feature = "async-io")]
mod async_io;

use std::io::{self, SeekFrom};

use bytes::Bytes;

use crate::buffer::{Buffer, ChunkedBuffer, ResizingBuffer};
use crate::error::BufferError;

/// Stream over a [`ResizingBuffer`].
pub type ResizingByteStream = BufferStream<ResizingBuffer<u8>>;

/// Stream over a [`ChunkedBuffer`].
pub type ChunkedByteStream = BufferStream<ChunkedBuffer<u8>>;

/// A readable, writable and seekable in-memory stream backed by a pooled
/// buffer.
///
/// Behaves like `std::io::Cursor<Vec<u8>>` except that seeking before the
/// start or past the end clamps instead of failing or extending.
///
/// # Example
///
/// ```
/// use std::io::{Read, Seek, SeekFrom, Write};
/// use poolbuf::ChunkedByteStream;
///
/// let mut stream = ChunkedByteStream::default();
/// stream.write_all(b"hello world")?;
/// stream.seek(SeekFrom::Start(6))?;
///
/// let mut word = String::new();
/// stream.read_to_string(&mut word)?;
/// assert_eq!(word, "world");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct BufferStream<B> {
    inner: B,
}

impl<B: Buffer<u8>> BufferStream<B> {
    /// Wraps `inner`. The cursor stays where the buffer had it.
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    /// Returns a reference to the underlying buffer.
    pub fn get_ref(&self) -> &B {
        &self.inner
    }

    /// Returns a mutable reference to the underlying buffer.
    pub fn get_mut(&mut self) -> &mut B {
        &mut self.inner
    }

    /// Unwraps the stream, returning the underlying buffer.
    pub fn into_inner(self) -> B {
        self.inner
    }

    /// Current cursor position.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Length of the stream, in bytes.
    pub fn len(&self) -> u64 {
        self.inner.len()
    }

    /// Returns true if the stream holds no data.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sets the length, see [`Buffer::set_len`].
    pub fn set_len(&mut self, length: u64) -> Result<u64, BufferError> {
        self.inner.set_len(length)
    }

    /// Reads one byte, or `None` at the end of data.
    pub fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            1 => Some(byte[0]),
            _ => None,
        }
    }

    /// Writes one byte at the cursor.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), BufferError> {
        self.inner.write(&[byte]).map(|_| ())
    }

    /// Copies the content from offset 0 into `target`, see
    /// [`Buffer::export_to`].
    pub fn export_to(&self, target: &mut [u8]) -> usize {
        self.inner.export_to(target)
    }

    /// Copies the whole content into a new `Vec`.
    pub fn to_vec(&self) -> Vec<u8> {
        self.inner.to_vec()
    }

    /// Copies the whole content into an owned [`Bytes`].
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.inner.to_vec())
    }

    /// Resolves a seek target, clamping it into `[0, len]`.
    fn seek_target(&self, from: SeekFrom) -> u64 {
        let (base, offset) = match from {
            SeekFrom::Start(position) => return position,
            SeekFrom::Current(offset) => (self.inner.position(), offset),
            SeekFrom::End(offset) => (self.inner.len(), offset),
        };

        if offset < 0 {
            base.saturating_sub(offset.unsigned_abs())
        } else {
            base.saturating_add(offset as u64)
        }
    }

    fn seek_to(&mut self, from: SeekFrom) -> Result<u64, BufferError> {
        let target = self.seek_target(from);
        self.inner.set_position(target)
    }
}

impl BufferStream<ResizingBuffer<u8>> {
    /// Borrows the content without copying.
    pub fn as_slice(&self) -> &[u8] {
        self.inner.peek()
    }
}

impl<B: Buffer<u8>> From<B> for BufferStream<B> {
    fn from(inner: B) -> Self {
        Self::new(inner)
    }
}

impl<B: Buffer<u8>> io::Read for BufferStream<B> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.inner.read(buf))
    }
}

impl<B: Buffer<u8>> io::Write for BufferStream<B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.inner.write(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<B: Buffer<u8>> io::Seek for BufferStream<B> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.seek_to(pos)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.inner.position())
    }
}
