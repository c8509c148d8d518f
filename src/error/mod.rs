//! Error types for poolbuf.

use std::fmt;

/// Errors that can occur while resizing or addressing a buffer.
///
/// Short reads and short exports are not errors; they are reported through
/// the returned item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The requested size is larger than the buffer can represent.
    CapacityExceeded {
        /// The size that was requested, in items.
        requested: u64,
        /// The largest size that could have been served, in items.
        max: u64,
    },

    /// The chunk index no longer covers a position it must cover.
    ///
    /// Chunks are kept contiguous by construction, so this only happens when
    /// the buffer state was corrupted (for example by unsynchronized shared
    /// access through unsafe code).
    Corrupted {
        /// The position that could not be located.
        position: u64,
    },

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::CapacityExceeded { requested, max } => {
                write!(
                    f,
                    "expected buffer capacity is too large: {} items (max {})",
                    requested, max
                )
            }
            BufferError::Corrupted { position } => {
                write!(
                    f,
                    "buffer state is corrupted, could not find position {}",
                    position
                )
            }
            BufferError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for BufferError {}

impl From<BufferError> for std::io::Error {
    fn from(e: BufferError) -> Self {
        let kind = match e {
            BufferError::CapacityExceeded { .. } => std::io::ErrorKind::OutOfMemory,
            BufferError::Corrupted { .. } => std::io::ErrorKind::InvalidData,
            BufferError::InvalidConfig { .. } => std::io::ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, e)
    }
}
