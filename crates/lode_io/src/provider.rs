//! Named backend providers and the registry that resolves them.
//!
//! A provider turns a location string into a bound reader/writer pair.
//! The log configuration only records a provider *name*; the registry maps
//! that name to an implementation when the backend is first needed.

use crate::backend::{DataReader, DataWriter, ReaderWriter};
use crate::error::IoResult;
use crate::file::FileBackend;
use crate::memory::InMemoryBackend;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Name of the read-write file provider.
pub const FILE_PROVIDER: &str = "file";
/// Name of the read-only file provider.
pub const FILE_READONLY_PROVIDER: &str = "file-readonly";
/// Name of the in-memory provider.
pub const MEMORY_PROVIDER: &str = "memory";

/// A pluggable factory for log backends.
///
/// # Invariants
///
/// - `name` is stable for the lifetime of the provider
/// - `new_reader_writer` returns a reader and writer bound to the same
///   location; the caller owns closing them
pub trait ReaderWriterProvider: Send + Sync {
    /// Registry name of this provider.
    fn name(&self) -> &str;

    /// Returns true if backends from this provider can only be read.
    fn is_readonly(&self) -> bool {
        false
    }

    /// Opens a reader/writer pair bound to `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is unusable or the backend cannot
    /// be opened.
    fn new_reader_writer(&self, location: &str) -> IoResult<ReaderWriter>;
}

impl fmt::Debug for dyn ReaderWriterProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderWriterProvider")
            .field("name", &self.name())
            .field("readonly", &self.is_readonly())
            .finish()
    }
}

/// Provider for [`FileBackend`]s rooted at a directory location.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProvider {
    readonly: bool,
}

impl FileProvider {
    /// Creates a read-write file provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { readonly: false }
    }

    /// Creates a file provider that opens existing logs without write access.
    #[must_use]
    pub const fn readonly() -> Self {
        Self { readonly: true }
    }
}

impl ReaderWriterProvider for FileProvider {
    fn name(&self) -> &str {
        if self.readonly {
            FILE_READONLY_PROVIDER
        } else {
            FILE_PROVIDER
        }
    }

    fn is_readonly(&self) -> bool {
        self.readonly
    }

    fn new_reader_writer(&self, location: &str) -> IoResult<ReaderWriter> {
        let backend = Arc::new(FileBackend::open_in_dir(location, self.readonly)?);
        debug!(location, readonly = self.readonly, "opened file backend");
        let reader: Arc<dyn DataReader> = backend.clone();
        let writer: Arc<dyn DataWriter> = backend;
        Ok((reader, writer))
    }
}

/// Provider for fresh [`InMemoryBackend`]s. Each call yields a new, empty
/// store; the location is only a label.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryProvider;

impl ReaderWriterProvider for MemoryProvider {
    fn name(&self) -> &str {
        MEMORY_PROVIDER
    }

    fn new_reader_writer(&self, location: &str) -> IoResult<ReaderWriter> {
        let backend = Arc::new(InMemoryBackend::new(location));
        let reader: Arc<dyn DataReader> = backend.clone();
        let writer: Arc<dyn DataWriter> = backend;
        Ok((reader, writer))
    }
}

/// Maps provider names to providers.
///
/// Registries are plain values: build one with [`ProviderRegistry::new`]
/// or [`ProviderRegistry::with_builtin`] and hand it to the configuration.
/// [`ProviderRegistry::builtin`] returns a shared, process-wide registry
/// holding only the built-in providers.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ReaderWriterProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the `file`, `file-readonly` and `memory`
    /// providers.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FileProvider::new()));
        registry.register(Arc::new(FileProvider::readonly()));
        registry.register(Arc::new(MemoryProvider));
        registry
    }

    /// Returns the shared registry of built-in providers.
    #[must_use]
    pub fn builtin() -> Arc<ProviderRegistry> {
        static BUILTIN: OnceLock<Arc<ProviderRegistry>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| Arc::new(Self::with_builtin()))
            .clone()
    }

    /// Registers `provider` under its own name, returning the provider it
    /// replaced, if any.
    pub fn register(
        &mut self,
        provider: Arc<dyn ReaderWriterProvider>,
    ) -> Option<Arc<dyn ReaderWriterProvider>> {
        let name = provider.name().to_string();
        debug!(provider = %name, "registering backend provider");
        self.providers.insert(name, provider)
    }

    /// Looks up a provider by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ReaderWriterProvider>> {
        self.providers.get(name).cloned()
    }

    /// Returns true if a provider named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Returns the registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
