//! Reader and writer contracts for log backends.

use crate::error::IoResult;
use std::sync::Arc;

/// Read side of a log backend bound to a location.
///
/// Backends are **opaque byte stores**. The log owns all format
/// interpretation; a reader only serves byte ranges.
///
/// # Invariants
///
/// - `read_at` returns exactly the bytes previously appended at that offset
/// - Readers must be `Send + Sync`: the page cache reads from many threads
pub trait DataReader: Send + Sync {
    /// Returns the location this reader is bound to.
    fn location(&self) -> &str;

    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The range extends beyond the current size
    /// - The backend is closed
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, len: usize) -> IoResult<Vec<u8>>;

    /// Returns the number of readable bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> IoResult<u64>;
}

/// Write side of a log backend bound to a location.
///
/// All methods take `&self`; implementations synchronize internally so the
/// writer can be shared behind an [`Arc`].
pub trait DataWriter: Send + Sync {
    /// Appends data to the end of the log and returns the offset it was
    /// written at.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is read-only, closed, or an I/O
    /// error occurs.
    fn append(&self, data: &[u8]) -> IoResult<u64>;

    /// Pushes buffered writes to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    fn flush(&self) -> IoResult<()>;

    /// Makes all appended data and metadata durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    fn sync(&self) -> IoResult<()>;

    /// Drops all data after `new_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if `new_size` is greater than the current size or
    /// the truncation fails.
    fn truncate(&self, new_size: u64) -> IoResult<()>;

    /// Returns the offset the next `append` will write at.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> IoResult<u64>;

    /// Releases the underlying resources. Later calls fail with
    /// [`IoError::Closed`](crate::IoError::Closed).
    ///
    /// # Errors
    ///
    /// Returns an error if pending data cannot be flushed.
    fn close(&self) -> IoResult<()>;
}

/// A reader and writer bound to the same location.
pub type ReaderWriter = (Arc<dyn DataReader>, Arc<dyn DataWriter>);
