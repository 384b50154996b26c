//! Error types for log backend operations.

use std::io;
use thiserror::Error;

/// Result type for backend operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while opening or using a log backend.
#[derive(Debug, Error)]
pub enum IoError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to read beyond the end of the backend's data.
    #[error("read beyond end of log data: offset {offset}, len {len}, size {size}")]
    ReadPastEnd {
        /// The requested read offset.
        offset: u64,
        /// The requested read length.
        len: usize,
        /// The current data size.
        size: u64,
    },

    /// A write was attempted through a read-only backend.
    #[error("backend at {location} is read-only")]
    ReadOnly {
        /// Location the backend is bound to.
        location: String,
    },

    /// The backend has been closed.
    #[error("backend is closed")]
    Closed,

    /// The location string cannot be used by this provider.
    #[error("invalid backend location {location:?}: {reason}")]
    InvalidLocation {
        /// The rejected location.
        location: String,
        /// Why the provider rejected it.
        reason: String,
    },
}
