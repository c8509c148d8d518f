//! String builder over a `char` buffer.

use std::fmt;

use crate::buffer::{Buffer, ChunkedBuffer, ResizingBuffer};
use crate::error::BufferError;
use crate::pool::{Item, MAX_ARRAY_ITEMS};

use super::STAGING_CHARS;

/// String buffer over a [`ResizingBuffer`].
pub type ResizingStringBuffer = StringBuffer<ResizingBuffer<char>>;

/// String buffer over a [`ChunkedBuffer`].
pub type ChunkedStringBuffer = StringBuffer<ChunkedBuffer<char>>;

/// Accumulates text in a pooled `char` buffer.
///
/// # Example
///
/// ```
/// use poolbuf::ChunkedStringBuffer;
///
/// let mut text = ChunkedStringBuffer::default();
/// text.append_str("pooled")?.append_char(' ')?.append_str("text")?;
/// assert_eq!(text.to_string(), "pooled text");
/// # Ok::<(), poolbuf::BufferError>(())
/// ```
#[derive(Debug, Default)]
pub struct StringBuffer<B> {
    chars: B,
}

impl<B: Buffer<char>> StringBuffer<B> {
    /// Wraps `chars`; text is appended at its cursor.
    pub fn new(chars: B) -> Self {
        Self { chars }
    }

    /// Returns the underlying buffer.
    pub fn get_ref(&self) -> &B {
        &self.chars
    }

    /// Unwraps the string buffer, returning the underlying buffer.
    pub fn into_inner(self) -> B {
        self.chars
    }

    /// Number of chars, clamped to the largest array size.
    pub fn len(&self) -> usize {
        self.chars.len().min(MAX_ARRAY_ITEMS as u64) as usize
    }

    /// Returns true if no text was appended.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Drops all text and releases the storage.
    pub fn clear(&mut self) -> &mut Self {
        self.chars.clear();
        self
    }

    /// Appends one char.
    pub fn append_char(&mut self, c: char) -> Result<&mut Self, BufferError> {
        self.chars.write(&[c])?;
        Ok(self)
    }

    /// Appends a slice of chars.
    pub fn append_chars(&mut self, chars: &[char]) -> Result<&mut Self, BufferError> {
        self.chars.write(chars)?;
        Ok(self)
    }

    /// Appends a string.
    pub fn append_str(&mut self, text: &str) -> Result<&mut Self, BufferError> {
        let mut staging = ['\0'; STAGING_CHARS];
        let mut staged = 0;
        for c in text.chars() {
            staging[staged] = c;
            staged += 1;
            if staged == STAGING_CHARS {
                self.chars.write(&staging)?;
                staged = 0;
            }
        }
        self.chars.write(&staging[..staged])?;
        Ok(self)
    }

    /// Copies the text from the start into `target`, returning the number
    /// of chars copied.
    pub fn export_to(&self, target: &mut [char]) -> usize {
        self.chars.export_to(target)
    }
}

impl ResizingStringBuffer {
    /// Borrows the text without copying.
    pub fn as_chars(&self) -> &[char] {
        self.chars.peek()
    }
}

impl<B: Buffer<char>> fmt::Write for StringBuffer<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s).map(|_| ()).map_err(|_| fmt::Error)
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.append_char(c).map(|_| ()).map_err(|_| fmt::Error)
    }
}

impl<B: Buffer<char>> fmt::Display for StringBuffer<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool = &char::shared_pools().items;
        let mut scratch = pool.allocate(self.len());
        let exported = self.chars.export_to(&mut scratch);

        let result = scratch[..exported]
            .iter()
            .try_for_each(|c| fmt::Write::write_char(f, *c));

        pool.recycle(scratch);
        result
    }
}
