//! Sized, seekable views over shared page bytes.
//!
//! The log page cache reads fixed-size pages into buffers and needs to
//! know how many bytes were actually filled (the last page of a log is
//! usually short) while still being able to seek backwards without
//! copying. [`SizedBuffer`] tracks that fill boundary separately from the
//! backing capacity.
//!
//! ## Aliasing
//!
//! The backing storage is an `Arc<[u8]>`. [`SizedBuffer::copy`] and
//! [`Clone`] share it; only the cursor state (position, mark, fill
//! boundary) is per-instance.

use crate::backend::DataReader;
use crate::error::{IoError, IoResult};
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

/// A bounded cursor over a shared byte region.
///
/// # Invariants
///
/// - `mark <= count <= backing length`
/// - `position <= count`
/// - [`size`](Self::size) is `count - mark`: the number of bytes filled
///   since the mark, not the capacity of the backing storage
#[derive(Debug, Clone)]
pub struct SizedBuffer {
    buf: Arc<[u8]>,
    pos: usize,
    count: usize,
    mark: usize,
}

impl SizedBuffer {
    /// Creates a buffer spanning all of `bytes`.
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        let buf = bytes.into();
        let len = buf.len();
        Self::from_shared(buf, 0, len)
    }

    /// Creates a buffer over the window `[offset, offset + length)` of
    /// `bytes`.
    ///
    /// The window is clamped to the backing length. The position and mark
    /// both start at `offset`.
    #[must_use]
    pub fn with_window(bytes: impl Into<Arc<[u8]>>, offset: usize, length: usize) -> Self {
        Self::from_shared(bytes.into(), offset, length)
    }

    /// Creates a buffer over a window of already-shared storage.
    #[must_use]
    pub fn from_shared(buf: Arc<[u8]>, offset: usize, length: usize) -> Self {
        let offset = offset.min(buf.len());
        let count = offset.saturating_add(length).min(buf.len());
        Self {
            buf,
            pos: offset,
            count,
            mark: offset,
        }
    }

    /// Returns the number of valid bytes since the mark.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.count - self.mark
    }

    /// Returns the fill boundary (exclusive index into the backing storage).
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the read cursor.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the read cursor, clamped to the fill boundary.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.count);
    }

    /// Returns the mark.
    #[inline]
    #[must_use]
    pub fn mark(&self) -> usize {
        self.mark
    }

    /// Sets the mark to the current position.
    pub fn mark_position(&mut self) {
        self.mark = self.pos;
    }

    /// Moves the read cursor back to the mark.
    pub fn reset(&mut self) {
        self.pos = self.mark;
    }

    /// Returns the number of bytes between the cursor and the fill boundary.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.count - self.pos
    }

    /// Returns the backing storage itself, not a copy.
    ///
    /// Callers must stay inside `[mark, count)` and must not assume they
    /// are the only holder.
    #[must_use]
    pub fn to_byte_array(&self) -> &Arc<[u8]> {
        &self.buf
    }

    /// Returns the valid window `[mark, count)`.
    #[must_use]
    pub fn as_window(&self) -> &[u8] {
        &self.buf[self.mark..self.count]
    }

    /// Returns a new cursor over the same storage.
    ///
    /// The copy starts (and is marked) at this buffer's current position
    /// and shares its fill boundary. Moving either cursor afterwards does
    /// not affect the other.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            buf: Arc::clone(&self.buf),
            pos: self.pos,
            count: self.count,
            mark: self.pos,
        }
    }

    /// Reads one page starting at `offset` from `reader`.
    ///
    /// The returned buffer has a capacity of `page_size`; its
    /// [`size`](Self::size) is the number of bytes actually read, which is
    /// less than `page_size` when the page crosses the end of the data.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::ReadPastEnd`] if `offset` is beyond the end of
    /// the data, or any error from the reader.
    pub fn read_page(reader: &dyn DataReader, offset: u64, page_size: usize) -> IoResult<Self> {
        let size = reader.size()?;
        if offset > size {
            return Err(IoError::ReadPastEnd {
                offset,
                len: page_size,
                size,
            });
        }

        let available = (size - offset).min(page_size as u64) as usize;
        let mut page = vec![0u8; page_size];
        let mut filled = 0;
        if available > 0 {
            let data = reader.read_at(offset, available)?;
            // A reader may hand back less than asked for
            filled = data.len().min(available);
            page[..filled].copy_from_slice(&data[..filled]);
        }
        Ok(Self::with_window(page, 0, filled))
    }
}

impl Read for SizedBuffer {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let n = out.len().min(self.remaining());
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Seek for SizedBuffer {
    /// Offsets are indices into the backing storage; `End` is relative to
    /// the fill boundary. The result is clamped to the fill boundary.
    fn seek(&mut self, target: SeekFrom) -> io::Result<u64> {
        let (base, delta) = match target {
            SeekFrom::Start(n) => {
                self.set_position(usize::try_from(n).unwrap_or(usize::MAX));
                return Ok(self.pos as u64);
            }
            SeekFrom::Current(delta) => (self.pos as i64, delta),
            SeekFrom::End(delta) => (self.count as i64, delta),
        };

        match base.checked_add(delta) {
            Some(pos) if pos >= 0 => {
                self.set_position(pos as usize);
                Ok(self.pos as u64)
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}
