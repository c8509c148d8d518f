//! Text on top of pooled buffers.
//!
//! - [`TextWriter`] - Encodes text into a byte buffer
//! - [`StringBuffer`] - Builds text in a `char` buffer
//! - [`TextEncoding`] - Encodings supported by the writer

mod string_buffer;
mod writer;

pub use string_buffer::{ChunkedStringBuffer, ResizingStringBuffer, StringBuffer};
pub use writer::{ChunkedTextWriter, ResizingTextWriter, TextEncoding, TextWriter};

/// Number of chars staged before they are encoded or written in one go.
pub(crate) const STAGING_CHARS: usize = 256;
