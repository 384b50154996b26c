//! File-based log backend.

use crate::backend::{DataReader, DataWriter};
use crate::error::{IoError, IoResult};
use parking_lot::RwLock;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Name of the data file inside a log directory.
pub const LOG_FILE_NAME: &str = "log.dat";

/// A file-based log backend serving as both reader and writer.
///
/// # Durability
///
/// - `flush()` calls `File::flush()` to push data to the OS
/// - `sync()` calls `File::sync_all()` to ensure data is on disk
///
/// # Read-only mode
///
/// A backend opened with [`FileBackend::open_readonly`] never opens the
/// file for writing; every [`DataWriter`] method except `close` fails with
/// [`IoError::ReadOnly`].
///
/// # Example
///
/// ```no_run
/// use lode_io::{DataWriter, FileBackend};
/// use std::path::Path;
///
/// let backend = FileBackend::open(Path::new("log.dat")).unwrap();
/// backend.append(b"persistent data").unwrap();
/// backend.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    location: String,
    path: PathBuf,
    readonly: bool,
    // `None` once closed.
    file: RwLock<Option<File>>,
    size: RwLock<u64>,
}

impl FileBackend {
    /// Opens or creates a read-write backend at the given file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created.
    pub fn open(path: &Path) -> IoResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Self::from_file(file, path, path.display().to_string(), false)
    }

    /// Opens an existing file without write access.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn open_readonly(path: &Path) -> IoResult<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Self::from_file(file, path, path.display().to_string(), true)
    }

    /// Opens the log file inside the directory `location`.
    ///
    /// In read-write mode the directory is created if missing. The returned
    /// backend reports `location` (not the file path) as its location.
    ///
    /// # Errors
    ///
    /// Returns an error if `location` is empty, names a regular file, or the
    /// directory or file cannot be opened.
    pub fn open_in_dir(location: &str, readonly: bool) -> IoResult<Self> {
        if location.is_empty() {
            return Err(IoError::InvalidLocation {
                location: location.to_string(),
                reason: "location is empty".to_string(),
            });
        }

        let dir = Path::new(location);
        if dir.is_file() {
            return Err(IoError::InvalidLocation {
                location: location.to_string(),
                reason: "location is a file, expected a directory".to_string(),
            });
        }
        if !readonly {
            std::fs::create_dir_all(dir)?;
        }

        let path = dir.join(LOG_FILE_NAME);
        let mut backend = if readonly {
            Self::open_readonly(&path)?
        } else {
            Self::open(&path)?
        };
        backend.location = location.to_string();
        Ok(backend)
    }

    fn from_file(file: File, path: &Path, location: String, readonly: bool) -> IoResult<Self> {
        let size = file.metadata()?.len();
        Ok(Self {
            location,
            path: path.to_path_buf(),
            readonly,
            file: RwLock::new(Some(file)),
            size: RwLock::new(size),
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the backend was opened without write access.
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    fn check_writable(&self) -> IoResult<()> {
        if self.readonly {
            return Err(IoError::ReadOnly {
                location: self.location.clone(),
            });
        }
        Ok(())
    }
}

impl DataReader for FileBackend {
    fn location(&self) -> &str {
        &self.location
    }

    fn read_at(&self, offset: u64, len: usize) -> IoResult<Vec<u8>> {
        let size = *self.size.read();
        let end = offset.saturating_add(len as u64);

        if offset > size || end > size {
            return Err(IoError::ReadPastEnd { offset, len, size });
        }

        // Seeking mutates the shared cursor
        let mut guard = self.file.write();
        let file = guard.as_mut().ok_or(IoError::Closed)?;

        if len == 0 {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(offset))?;
        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    fn size(&self) -> IoResult<u64> {
        if self.file.read().is_none() {
            return Err(IoError::Closed);
        }
        Ok(*self.size.read())
    }
}

impl DataWriter for FileBackend {
    fn append(&self, data: &[u8]) -> IoResult<u64> {
        self.check_writable()?;

        let mut guard = self.file.write();
        let file = guard.as_mut().ok_or(IoError::Closed)?;
        let mut size = self.size.write();

        let offset = *size;
        if data.is_empty() {
            return Ok(offset);
        }

        file.seek(SeekFrom::End(0))?;
        file.write_all(data)?;
        *size += data.len() as u64;

        Ok(offset)
    }

    fn flush(&self) -> IoResult<()> {
        self.check_writable()?;
        let mut guard = self.file.write();
        guard.as_mut().ok_or(IoError::Closed)?.flush()?;
        Ok(())
    }

    fn sync(&self) -> IoResult<()> {
        self.check_writable()?;
        let guard = self.file.write();
        guard.as_ref().ok_or(IoError::Closed)?.sync_all()?;
        Ok(())
    }

    fn truncate(&self, new_size: u64) -> IoResult<()> {
        self.check_writable()?;

        let guard = self.file.write();
        let file = guard.as_ref().ok_or(IoError::Closed)?;
        let mut size = self.size.write();

        if new_size > *size {
            return Err(IoError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "cannot truncate to size {} which is greater than current size {}",
                    new_size, *size
                ),
            )));
        }

        file.set_len(new_size)?;
        file.sync_all()?;
        *size = new_size;

        Ok(())
    }

    fn size(&self) -> IoResult<u64> {
        DataReader::size(self)
    }

    fn close(&self) -> IoResult<()> {
        if let Some(mut file) = self.file.write().take() {
            if !self.readonly {
                file.flush()?;
            }
        }
        Ok(())
    }
}
