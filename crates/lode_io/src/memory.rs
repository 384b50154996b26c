//! In-memory log backend.

use crate::backend::{DataReader, DataWriter};
use crate::error::{IoError, IoResult};
use parking_lot::RwLock;

/// An in-memory log backend serving as both reader and writer.
///
/// Suitable for:
/// - Unit and integration tests
/// - Ephemeral logs that don't need persistence
///
/// The location is only a label; nothing touches the file system.
///
/// # Example
///
/// ```rust
/// use lode_io::{DataReader, DataWriter, InMemoryBackend};
///
/// let backend = InMemoryBackend::new("mem:test");
/// let offset = backend.append(b"test data").unwrap();
/// assert_eq!(offset, 0);
/// assert_eq!(DataReader::size(&backend).unwrap(), 9);
/// ```
#[derive(Debug)]
pub struct InMemoryBackend {
    location: String,
    // `None` once closed.
    data: RwLock<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates an empty backend labelled with `location`.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self::with_data(location, Vec::new())
    }

    /// Creates a backend with pre-existing data.
    ///
    /// Useful for testing recovery scenarios.
    #[must_use]
    pub fn with_data(location: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            location: location.into(),
            data: RwLock::new(Some(data)),
        }
    }

    /// Returns a copy of all data in the backend, or `None` once closed.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }
}

impl DataReader for InMemoryBackend {
    fn location(&self) -> &str {
        &self.location
    }

    fn read_at(&self, offset: u64, len: usize) -> IoResult<Vec<u8>> {
        let guard = self.data.read();
        let data = guard.as_ref().ok_or(IoError::Closed)?;
        let size = data.len() as u64;
        let start = offset as usize;
        let end = start.saturating_add(len);

        if offset > size || end > data.len() {
            return Err(IoError::ReadPastEnd { offset, len, size });
        }

        Ok(data[start..end].to_vec())
    }

    fn size(&self) -> IoResult<u64> {
        let guard = self.data.read();
        Ok(guard.as_ref().ok_or(IoError::Closed)?.len() as u64)
    }
}

impl DataWriter for InMemoryBackend {
    fn append(&self, new_data: &[u8]) -> IoResult<u64> {
        let mut guard = self.data.write();
        let data = guard.as_mut().ok_or(IoError::Closed)?;
        let offset = data.len() as u64;
        data.extend_from_slice(new_data);
        Ok(offset)
    }

    fn flush(&self) -> IoResult<()> {
        // Nothing is buffered
        if self.data.read().is_none() {
            return Err(IoError::Closed);
        }
        Ok(())
    }

    fn sync(&self) -> IoResult<()> {
        self.flush()
    }

    fn truncate(&self, new_size: u64) -> IoResult<()> {
        let mut guard = self.data.write();
        let data = guard.as_mut().ok_or(IoError::Closed)?;
        let current_size = data.len() as u64;

        if new_size > current_size {
            return Err(IoError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "cannot truncate to size {} which is greater than current size {}",
                    new_size, current_size
                ),
            )));
        }

        data.truncate(new_size as usize);
        Ok(())
    }

    fn size(&self) -> IoResult<u64> {
        DataReader::size(self)
    }

    fn close(&self) -> IoResult<()> {
        self.data.write().take();
        Ok(())
    }
}
