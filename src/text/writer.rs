//! Text writer encoding into a byte buffer.

use std::fmt;

use crate::buffer::{Buffer, ChunkedBuffer, ResizingBuffer};
use crate::error::BufferError;
use crate::pool::Item;

use super::STAGING_CHARS;

/// Largest number of bytes one char encodes to, in any supported encoding.
const MAX_CHAR_BYTES: usize = 4;

/// Text writer over a [`ResizingBuffer`].
pub type ResizingTextWriter = TextWriter<ResizingBuffer<u8>>;

/// Text writer over a [`ChunkedBuffer`].
pub type ChunkedTextWriter = TextWriter<ChunkedBuffer<u8>>;

/// Character encodings a [`TextWriter`] can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// UTF-16, little endian, no byte order mark.
    Utf16Le,
    /// UTF-16, big endian, no byte order mark.
    Utf16Be,
}

impl TextEncoding {
    /// Encodes `chars` into `target`, returning the number of bytes written.
    ///
    /// `target` must hold at least `chars.len() * 4` bytes.
    fn encode(self, chars: &[char], target: &mut [u8]) -> usize {
        let mut length = 0;
        for &c in chars {
            length += match self {
                TextEncoding::Utf8 => c.encode_utf8(&mut target[length..]).len(),
                TextEncoding::Utf16Le => encode_utf16(c, &mut target[length..], u16::to_le_bytes),
                TextEncoding::Utf16Be => encode_utf16(c, &mut target[length..], u16::to_be_bytes),
            };
        }
        length
    }
}

fn encode_utf16(c: char, target: &mut [u8], to_bytes: fn(u16) -> [u8; 2]) -> usize {
    let mut units = [0u16; 2];
    let units = c.encode_utf16(&mut units);
    for (index, unit) in units.iter().enumerate() {
        target[index * 2..index * 2 + 2].copy_from_slice(&to_bytes(*unit));
    }
    units.len() * 2
}

/// Writes text into a byte buffer.
///
/// Chars are staged in a small fixed array and encoded into the buffer
/// whenever it fills up and on [`flush`](Self::flush). Staged text is not
/// visible in the buffer until then; [`into_inner`](Self::into_inner)
/// flushes before handing the buffer back. Dropping the writer without
/// flushing loses the staged chars.
///
/// # Example
///
/// ```
/// use std::fmt::Write;
/// use poolbuf::ResizingTextWriter;
///
/// let mut writer = ResizingTextWriter::default();
/// write!(writer, "{} + {} = {}", 2, 2, 4)?;
/// assert_eq!(writer.as_bytes()?, b"2 + 2 = 4");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TextWriter<B> {
    bytes: B,
    encoding: TextEncoding,
    staging: [char; STAGING_CHARS],
    staged: usize,
}

impl<B: Buffer<u8>> TextWriter<B> {
    /// Creates a UTF-8 writer appending at the cursor of `bytes`.
    pub fn new(bytes: B) -> Self {
        Self::with_encoding(bytes, TextEncoding::default())
    }

    /// Creates a writer producing `encoding`.
    pub fn with_encoding(bytes: B, encoding: TextEncoding) -> Self {
        Self {
            bytes,
            encoding,
            staging: ['\0'; STAGING_CHARS],
            staged: 0,
        }
    }

    /// Returns the encoding this writer produces.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Returns the buffer. Staged chars are not in it yet.
    pub fn get_ref(&self) -> &B {
        &self.bytes
    }

    /// Writes a single char.
    pub fn write_char(&mut self, c: char) -> Result<(), BufferError> {
        self.write_chars(&[c])
    }

    /// Writes a string.
    pub fn write_text(&mut self, text: &str) -> Result<(), BufferError> {
        for c in text.chars() {
            if self.staged == STAGING_CHARS {
                self.flush()?;
            }
            self.staging[self.staged] = c;
            self.staged += 1;
        }
        Ok(())
    }

    /// Writes a slice of chars.
    pub fn write_chars(&mut self, mut chars: &[char]) -> Result<(), BufferError> {
        while !chars.is_empty() {
            if self.staged == STAGING_CHARS {
                self.flush()?;
            }

            let length = chars.len().min(STAGING_CHARS - self.staged);
            self.staging[self.staged..self.staged + length].copy_from_slice(&chars[..length]);
            self.staged += length;
            chars = &chars[length..];
        }
        Ok(())
    }

    /// Writes `text` followed by a line feed.
    pub fn write_line(&mut self, text: &str) -> Result<(), BufferError> {
        self.write_text(text)?;
        self.write_char('\n')
    }

    /// Writes what is left of `source`, from its cursor to its end.
    ///
    /// The text is moved through a scratch array rented from the shared
    /// `char` pool.
    pub fn write_buffer<C: Buffer<char>>(&mut self, source: &mut C) -> Result<(), BufferError> {
        let remaining = source.len() - source.position();
        if remaining == 0 {
            return Ok(());
        }

        let pool = &char::shared_pools().items;
        let hint = usize::try_from(remaining).unwrap_or(usize::MAX);
        let mut scratch = pool.allocate_chunk(hint);
        let mut result = Ok(());

        loop {
            let read = source.read(&mut scratch);
            if read == 0 {
                break;
            }
            result = self.write_chars(&scratch[..read]);
            if result.is_err() {
                break;
            }
        }

        pool.recycle(scratch);
        result
    }

    /// Encodes the staged chars into the buffer.
    pub fn flush(&mut self) -> Result<(), BufferError> {
        if self.staged == 0 {
            return Ok(());
        }

        let mut encoded = [0u8; STAGING_CHARS * MAX_CHAR_BYTES];
        let length = self.encoding.encode(&self.staging[..self.staged], &mut encoded);
        self.bytes.write(&encoded[..length])?;
        self.staged = 0;
        Ok(())
    }

    /// Flushes and returns the buffer.
    pub fn into_inner(mut self) -> Result<B, BufferError> {
        self.flush()?;
        Ok(self.bytes)
    }
}

impl TextWriter<ResizingBuffer<u8>> {
    /// Flushes and borrows the encoded bytes.
    pub fn as_bytes(&mut self) -> Result<&[u8], BufferError> {
        self.flush()?;
        Ok(self.bytes.peek())
    }
}

impl<B: Buffer<u8> + Default> Default for TextWriter<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}

impl<B: Buffer<u8>> fmt::Write for TextWriter<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s).map_err(|_| fmt::Error)
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        TextWriter::write_char(self, c).map_err(|_| fmt::Error)
    }
}

impl<B: fmt::Debug> fmt::Debug for TextWriter<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextWriter")
            .field("bytes", &self.bytes)
            .field("encoding", &self.encoding)
            .field("staged", &self.staged)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    fn writer(encoding: TextEncoding) -> ResizingTextWriter {
        TextWriter::with_encoding(ResizingBuffer::new(), encoding)
    }

    #[test]
    fn test_staged_until_flush() {
        let mut writer = writer(TextEncoding::Utf8);
        writer.write_text("hello").unwrap();
        assert_eq!(writer.get_ref().len(), 0);
        writer.flush().unwrap();
        assert_eq!(writer.get_ref().len(), 5);
    }

    #[test]
    fn test_flushes_when_staging_fills() {
        let mut writer = writer(TextEncoding::Utf8);
        let text = "x".repeat(STAGING_CHARS + 10);
        writer.write_text(&text).unwrap();
        assert_eq!(writer.get_ref().len(), STAGING_CHARS as u64);
        assert_eq!(writer.as_bytes().unwrap(), text.as_bytes());
    }

    #[test]
    fn test_exactly_full_staging() {
        let mut writer = writer(TextEncoding::Utf8);
        let text = "y".repeat(STAGING_CHARS);
        writer.write_text(&text).unwrap();
        writer.write_text("").unwrap();
        assert_eq!(writer.as_bytes().unwrap(), text.as_bytes());
    }

    #[test]
    fn test_utf16() {
        let text = "añ€😀";
        let expected_le: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let expected_be: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();

        let mut le = writer(TextEncoding::Utf16Le);
        le.write_text(text).unwrap();
        assert_eq!(le.as_bytes().unwrap(), &expected_le[..]);

        let mut be = writer(TextEncoding::Utf16Be);
        be.write_text(text).unwrap();
        assert_eq!(be.as_bytes().unwrap(), &expected_be[..]);
    }

    #[test]
    fn test_fmt_and_lines() {
        let mut writer = writer(TextEncoding::Utf8);
        write!(writer, "{}-{}", 1, "two").unwrap();
        writer.write_line("").unwrap();
        writer.write_line("three").unwrap();
        let bytes = writer.into_inner().unwrap();
        assert_eq!(bytes.peek(), b"1-two\nthree\n");
    }

    #[test]
    fn test_write_buffer() {
        let mut chars = ResizingBuffer::<char>::new();
        let text: Vec<char> = "from a char buffer".chars().collect();
        chars.write(&text).unwrap();
        chars.set_position(5).unwrap();

        let mut writer = writer(TextEncoding::Utf8);
        writer.write_buffer(&mut chars).unwrap();
        assert_eq!(writer.as_bytes().unwrap(), b"a char buffer");
        assert_eq!(chars.position(), chars.len());
    }
}
