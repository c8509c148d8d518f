//! Text writer and string buffer example.
//!
//! Run with:
//!     cargo run --example text_writer

use std::fmt::Write;

use poolbuf::{
    Buffer, ChunkedBuffer, ChunkedStringBuffer, ResizingTextWriter, TextEncoding, TextWriter,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // UTF-8 report rendered straight into pooled bytes
    let mut report = ResizingTextWriter::default();
    writeln!(report, "{:<8}{:>8}", "name", "count")?;
    for (name, count) in [("alpha", 3), ("beta", 14), ("gamma", 159)] {
        writeln!(report, "{:<8}{:>8}", name, count)?;
    }
    let bytes = report.as_bytes()?;
    println!("UTF-8 report ({} bytes):\n{}", bytes.len(), String::from_utf8_lossy(bytes));

    // The same text as UTF-16LE in a chunked buffer
    let mut utf16 = TextWriter::with_encoding(ChunkedBuffer::<u8>::new(), TextEncoding::Utf16Le);
    utf16.write_line("grüße 👋")?;
    let encoded = utf16.into_inner()?.to_vec();
    println!("UTF-16LE: {:02x?}", encoded);

    // Building a long string without a growing String
    let mut text = ChunkedStringBuffer::default();
    for i in 0..10 {
        text.append_str("item ")?;
        write!(text, "{}", i)?;
        text.append_char(';')?;
    }
    println!("\nString buffer ({} chars): {}", text.len(), text);

    Ok(())
}
