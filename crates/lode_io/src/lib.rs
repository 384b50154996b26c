//! # Lode I/O
//!
//! Backend contracts and building blocks for the Lode log.
//!
//! This crate provides the lowest-level pieces the log configuration wires
//! together. Backends are **opaque byte stores** - they do not interpret
//! the data they store.
//!
//! ## Contents
//!
//! - [`DataReader`] / [`DataWriter`] - the read and write halves of a backend
//! - [`ReaderWriterProvider`] - a named factory producing a bound pair
//! - [`ProviderRegistry`] - name to provider lookup
//! - [`SizedBuffer`] - a seekable view over shared page bytes
//!
//! ## Built-in Providers
//!
//! - `file` - [`FileBackend`] rooted at a directory
//! - `file-readonly` - the same, without write access
//! - `memory` - [`InMemoryBackend`] for tests and ephemeral logs
//!
//! ## Example
//!
//! ```rust
//! use lode_io::{ProviderRegistry, MEMORY_PROVIDER};
//!
//! let registry = ProviderRegistry::with_builtin();
//! let provider = registry.get(MEMORY_PROVIDER).unwrap();
//! let (reader, writer) = provider.new_reader_writer("mem:example").unwrap();
//! let offset = writer.append(b"hello world").unwrap();
//! assert_eq!(reader.read_at(offset, 5).unwrap(), b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod buffer;
mod error;
mod file;
mod memory;
mod provider;

pub use backend::{DataReader, DataWriter, ReaderWriter};
pub use buffer::SizedBuffer;
pub use error::{IoError, IoResult};
pub use file::{FileBackend, LOG_FILE_NAME};
pub use memory::InMemoryBackend;
pub use provider::{
    FileProvider, MemoryProvider, ProviderRegistry, ReaderWriterProvider, FILE_PROVIDER,
    FILE_READONLY_PROVIDER, MEMORY_PROVIDER,
};
