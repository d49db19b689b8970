use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RingError {
    #[error("Invalid capacity {capacity}: {reason}")]
    InvalidCapacity {
        capacity: usize,
        reason: &'static str,
    },

    #[error("Range out of bounds: offset {offset} + count {count} exceeds buffer length {len}")]
    OutOfBounds {
        offset: usize,
        count: usize,
        len: usize,
    },

    #[error("Unsupported {operation}: {reason}")]
    Unsupported {
        operation: &'static str,
        reason: &'static str,
    },

    #[error("Cannot take from an empty buffer")]
    Empty,

    #[error("Stream has been disposed")]
    Disposed,

    #[error("Failed to allocate {capacity} byte backing block")]
    Allocation { capacity: usize },
}

/// Coarse classification of [`RingError`] for callers that only care
/// about what went wrong, not the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    UnsupportedOperation,
    InvalidState,
}

impl RingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCapacity { .. } | Self::OutOfBounds { .. } => ErrorKind::InvalidArgument,
            Self::Unsupported { .. } => ErrorKind::UnsupportedOperation,
            Self::Empty | Self::Disposed | Self::Allocation { .. } => ErrorKind::InvalidState,
        }
    }
}

impl From<RingError> for io::Error {
    fn from(err: RingError) -> Self {
        let kind = match err.kind() {
            ErrorKind::InvalidArgument => io::ErrorKind::InvalidInput,
            ErrorKind::UnsupportedOperation => io::ErrorKind::Unsupported,
            ErrorKind::InvalidState => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}
