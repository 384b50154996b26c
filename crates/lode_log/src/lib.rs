//! # Lode Log
//!
//! Decides how the Lode log is persisted and hands those decisions to the
//! rest of the engine.
//!
//! This crate provides:
//! - [`LogConfig`] - fluent configuration with lazy, at-most-once backend
//!   resolution
//! - [`LogOptions`] / [`LogOptionsBuilder`] - immutable options with an
//!   explicit [`LogOptions::resolve`] step
//! - [`LogDefaults`] - fallback values for unset settings
//! - [`BlobHandleGenerator`] - blob identity minting, including the
//!   always-failing [`IMMUTABLE`] generator
//!
//! The crate never interprets log contents. Backends come from a
//! [`lode_io::ProviderRegistry`].
//!
//! ## Example
//!
//! ```rust
//! use lode_log::{LogDefaults, LogOptions};
//! use lode_io::ProviderRegistry;
//!
//! let options = LogOptions::builder()
//!     .location("mem:doc")
//!     .backend("memory")
//!     .file_size_kb(8192)
//!     .build();
//!
//! let backend = options.resolve(&ProviderRegistry::with_builtin()).unwrap();
//! backend.writer().append(b"entry").unwrap();
//! assert_eq!(options.file_size_kb(&LogDefaults::default()), 8192);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cipher;
mod config;
mod defaults;
mod error;
mod handle;
mod options;

pub use cipher::{CipherKey, CipherSettings, StreamCipherProvider};
pub use config::LogConfig;
pub use defaults::{
    LogDefaults, DEFAULT_CACHE_GENERATION_COUNT, DEFAULT_CACHE_OPEN_FILES_COUNT,
    DEFAULT_CACHE_PAGE_SIZE, DEFAULT_CACHE_READ_AHEAD_MULTIPLE, DEFAULT_FILE_SIZE_KB,
    DEFAULT_MEMORY_USAGE_PERCENTAGE, DEFAULT_SYNC_PERIOD_MS,
};
pub use error::{LogError, LogResult};
pub use handle::{
    BlobHandleGenerator, ImmutableHandleGenerator, SequentialHandleGenerator, IMMUTABLE,
};
pub use options::{LogOptions, LogOptionsBuilder, MemoryUsagePolicy, OpenedBackend};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
