//! Immutable log options and explicit backend resolution.
//!
//! [`LogOptions`] is a plain value: build it with [`LogOptionsBuilder`] or
//! load it from JSON, then call [`LogOptions::resolve`] once to open the
//! backend. Unset numeric settings are `None` and fall back to the
//! [`LogDefaults`] handed to the accessors.

use crate::cipher::{CipherKey, CipherSettings, StreamCipherProvider};
use crate::defaults::LogDefaults;
use crate::error::{LogError, LogResult};
use lode_io::{DataReader, DataWriter, ProviderRegistry, ReaderWriter, ReaderWriterProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::{NonZeroU32, NonZeroU64};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How the log cache should size itself, as far as the options say.
///
/// Both an absolute size and a percentage may be configured. The log layer
/// does not pick one; the engine decides what `Conflicting` means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUsagePolicy {
    /// Neither setting was configured.
    Unset,
    /// Only an absolute size in bytes was configured.
    Absolute(u64),
    /// Only a percentage of the memory budget was configured.
    Percentage(u32),
    /// Both were configured.
    Conflicting {
        /// Absolute size in bytes.
        bytes: u64,
        /// Percentage of the memory budget.
        percentage: u32,
    },
}

/// A reader/writer pair supplied directly instead of through a provider.
#[derive(Clone)]
pub(crate) struct ExplicitBackend(pub(crate) ReaderWriter);

impl fmt::Debug for ExplicitBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplicitBackend")
            .field("location", &self.0 .0.location())
            .finish()
    }
}

/// Settings that decide how the log is persisted.
///
/// Runtime-only settings (cipher provider and key, explicit reader/writer)
/// are skipped by serde.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    pub(crate) location: Option<String>,
    pub(crate) backend: Option<String>,
    pub(crate) file_size_kb: Option<NonZeroU64>,
    pub(crate) lock_timeout_ms: u64,
    pub(crate) lock_ignored: bool,
    pub(crate) memory_usage: Option<NonZeroU64>,
    pub(crate) memory_usage_percentage: Option<NonZeroU32>,
    pub(crate) durable_write: bool,
    pub(crate) shared_cache: bool,
    pub(crate) non_blocking_cache: bool,
    pub(crate) cache_generation_count: Option<NonZeroU32>,
    pub(crate) cache_read_ahead_multiple: Option<NonZeroU32>,
    pub(crate) cache_page_size: Option<NonZeroU32>,
    pub(crate) cache_open_files_count: Option<NonZeroU32>,
    pub(crate) clean_directory_expected: bool,
    pub(crate) clear_invalid_log: bool,
    pub(crate) sync_period_ms: Option<NonZeroU64>,
    pub(crate) full_file_readonly: bool,
    pub(crate) cipher_basic_iv: u64,
    #[serde(skip)]
    pub(crate) cipher_provider: Option<Arc<dyn StreamCipherProvider>>,
    #[serde(skip)]
    pub(crate) cipher_key: Option<CipherKey>,
    #[serde(skip)]
    pub(crate) explicit: Option<ExplicitBackend>,
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl LogOptions {
    /// Starts building options.
    #[must_use]
    pub fn builder() -> LogOptionsBuilder {
        LogOptionsBuilder::default()
    }

    /// Parses options from a JSON document. Missing keys stay unset.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidSetting`] if the document is malformed,
    /// including zero for a setting that must be positive.
    pub fn from_json(json: &str) -> LogResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| LogError::invalid_setting(format!("cannot parse log options: {e}")))
    }

    /// Serializes the persistable settings as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidSetting`] if serialization fails.
    pub fn to_json(&self) -> LogResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LogError::invalid_setting(format!("cannot serialize log options: {e}")))
    }

    /// Returns the backend location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the backend provider name.
    #[must_use]
    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref()
    }

    /// Returns true if a reader/writer pair was supplied directly.
    #[must_use]
    pub fn has_explicit_backend(&self) -> bool {
        self.explicit.is_some()
    }

    /// Log file size in kilobytes.
    #[must_use]
    pub fn file_size_kb(&self, defaults: &LogDefaults) -> u64 {
        self.file_size_kb.map_or(defaults.file_size_kb, NonZeroU64::get)
    }

    /// Lock acquisition timeout. Zero is passed through unchanged.
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Whether the directory lock is ignored.
    #[must_use]
    pub fn is_lock_ignored(&self) -> bool {
        self.lock_ignored
    }

    /// Absolute log cache size in bytes, if configured.
    #[must_use]
    pub fn memory_usage(&self) -> Option<u64> {
        self.memory_usage.map(NonZeroU64::get)
    }

    /// Share of the memory budget for the log cache, in percent.
    #[must_use]
    pub fn memory_usage_percentage(&self, defaults: &LogDefaults) -> u32 {
        self.memory_usage_percentage
            .map_or(defaults.memory_usage_percentage, NonZeroU32::get)
    }

    /// Reports which memory settings were configured.
    #[must_use]
    pub fn memory_usage_policy(&self) -> MemoryUsagePolicy {
        match (self.memory_usage, self.memory_usage_percentage) {
            (None, None) => MemoryUsagePolicy::Unset,
            (Some(bytes), None) => MemoryUsagePolicy::Absolute(bytes.get()),
            (None, Some(percentage)) => MemoryUsagePolicy::Percentage(percentage.get()),
            (Some(bytes), Some(percentage)) => MemoryUsagePolicy::Conflicting {
                bytes: bytes.get(),
                percentage: percentage.get(),
            },
        }
    }

    /// Whether every commit is synced to stable storage.
    #[must_use]
    pub fn is_durable_write(&self) -> bool {
        self.durable_write
    }

    /// Whether the log cache is shared between engines.
    #[must_use]
    pub fn is_shared_cache(&self) -> bool {
        self.shared_cache
    }

    /// Whether the log cache is non-blocking.
    #[must_use]
    pub fn is_non_blocking_cache(&self) -> bool {
        self.non_blocking_cache
    }

    /// Number of log cache generations.
    #[must_use]
    pub fn cache_generation_count(&self, defaults: &LogDefaults) -> u32 {
        self.cache_generation_count
            .map_or(defaults.cache_generation_count, NonZeroU32::get)
    }

    /// Read-ahead multiple of the log cache.
    #[must_use]
    pub fn cache_read_ahead_multiple(&self, defaults: &LogDefaults) -> u32 {
        self.cache_read_ahead_multiple
            .map_or(defaults.cache_read_ahead_multiple, NonZeroU32::get)
    }

    /// Log cache page size in bytes.
    #[must_use]
    pub fn cache_page_size(&self, defaults: &LogDefaults) -> u32 {
        self.cache_page_size
            .map_or(defaults.cache_page_size, NonZeroU32::get)
    }

    /// Number of log files the cache keeps open.
    #[must_use]
    pub fn cache_open_files_count(&self, defaults: &LogDefaults) -> u32 {
        self.cache_open_files_count
            .map_or(defaults.cache_open_files_count, NonZeroU32::get)
    }

    /// Whether the log directory is expected to be empty on open.
    #[must_use]
    pub fn is_clean_directory_expected(&self) -> bool {
        self.clean_directory_expected
    }

    /// Whether an invalid log is cleared instead of failing the open.
    #[must_use]
    pub fn is_clear_invalid_log(&self) -> bool {
        self.clear_invalid_log
    }

    /// Period between background syncs.
    #[must_use]
    pub fn sync_period(&self, defaults: &LogDefaults) -> Duration {
        self.sync_period_ms
            .map_or(defaults.sync_period(), |ms| Duration::from_millis(ms.get()))
    }

    /// Whether full log files are switched to read-only.
    #[must_use]
    pub fn is_full_file_readonly(&self) -> bool {
        self.full_file_readonly
    }

    /// Returns the cipher, if configured.
    #[must_use]
    pub fn cipher_provider(&self) -> Option<&Arc<dyn StreamCipherProvider>> {
        self.cipher_provider.as_ref()
    }

    /// Returns the cipher key, if configured.
    #[must_use]
    pub fn cipher_key(&self) -> Option<&CipherKey> {
        self.cipher_key.as_ref()
    }

    /// Returns the basic IV.
    #[must_use]
    pub fn cipher_basic_iv(&self) -> u64 {
        self.cipher_basic_iv
    }

    /// Returns the full cipher configuration when both a cipher and a key
    /// are set.
    #[must_use]
    pub fn cipher(&self) -> Option<CipherSettings> {
        match (&self.cipher_provider, &self.cipher_key) {
            (Some(provider), Some(key)) => Some(CipherSettings::new(
                Arc::clone(provider),
                key.clone(),
                self.cipher_basic_iv,
            )),
            _ => None,
        }
    }

    /// Returns true if the log is encrypted.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.cipher_provider.is_some() && self.cipher_key.is_some()
    }

    /// Checks that settings which only make sense together were set
    /// together.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidSetting`] if a cipher is set without a
    /// key, a key without a cipher, or the key is empty.
    pub fn validate(&self) -> LogResult<()> {
        match (&self.cipher_provider, &self.cipher_key) {
            (Some(provider), None) => Err(LogError::invalid_setting(format!(
                "cipher {} is set but no cipher key is given",
                provider.id()
            ))),
            (None, Some(_)) => Err(LogError::invalid_setting(
                "cipher key is set but no cipher provider is given",
            )),
            (Some(_), Some(key)) if key.is_empty() => {
                Err(LogError::invalid_setting("cipher key is empty"))
            }
            _ => Ok(()),
        }
    }

    /// Looks up the configured provider.
    ///
    /// Returns `Ok(None)` if no backend name is set.
    pub(crate) fn lookup_provider(
        &self,
        registry: &ProviderRegistry,
    ) -> LogResult<Option<Arc<dyn ReaderWriterProvider>>> {
        let Some(name) = self.backend.as_deref() else {
            return Ok(None);
        };
        match registry.get(name) {
            Some(provider) => {
                debug!(provider = %name, "resolved reader/writer provider");
                Ok(Some(provider))
            }
            None => {
                warn!(provider = %name, "unknown reader/writer provider");
                Err(LogError::unknown_provider(name))
            }
        }
    }

    /// Builds the reader/writer pair through a provider.
    ///
    /// Checks the location before looking at the provider so a missing
    /// location is reported even when no backend name is set.
    pub(crate) fn open_pair(
        &self,
        provider: impl FnOnce() -> LogResult<Option<Arc<dyn ReaderWriterProvider>>>,
    ) -> LogResult<ReaderWriter> {
        let location = self.location.as_deref().ok_or(LogError::MissingLocation)?;
        let provider = provider()?.ok_or(LogError::NoBackend)?;

        let pair = provider.new_reader_writer(location)?;
        info!(
            provider = %provider.name(),
            location,
            readonly = provider.is_readonly(),
            "opened log reader and writer"
        );
        Ok(pair)
    }

    /// Opens the backend described by these options.
    ///
    /// An explicit reader/writer pair wins; otherwise the provider named by
    /// the backend name is looked up in `registry` and asked for a pair
    /// bound to the location. Each call opens a new pair: call it once and
    /// keep the result.
    ///
    /// # Errors
    ///
    /// - [`LogError::InvalidSetting`] if [`validate`](Self::validate) fails
    /// - [`LogError::MissingLocation`] if no location is set
    /// - [`LogError::UnknownProvider`] if the backend name is not registered
    /// - [`LogError::NoBackend`] if there is neither a backend name nor an
    ///   explicit pair
    /// - [`LogError::Backend`] if the provider fails to open the backend
    pub fn resolve(&self, registry: &ProviderRegistry) -> LogResult<OpenedBackend> {
        self.validate()?;
        if self.explicit.is_none() && self.location.is_none() {
            return Err(LogError::MissingLocation);
        }

        let provider = self.lookup_provider(registry)?;
        let (reader, writer) = match &self.explicit {
            Some(explicit) => explicit.0.clone(),
            None => self.open_pair(|| Ok(provider.clone()))?,
        };
        Ok(OpenedBackend::new(reader, writer, provider))
    }
}

/// Builder for [`LogOptions`].
///
/// Numeric settings given as zero stay unset and fall back to
/// [`LogDefaults`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct LogOptionsBuilder {
    options: LogOptions,
}

impl LogOptionsBuilder {
    /// Sets the backend location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.options.location = Some(location.into());
        self
    }

    /// Sets the backend provider name.
    pub fn backend(mut self, name: impl Into<String>) -> Self {
        self.options.backend = Some(name.into());
        self
    }

    /// Supplies the reader and writer directly, bypassing providers.
    pub fn reader_writer(mut self, reader: Arc<dyn DataReader>, writer: Arc<dyn DataWriter>) -> Self {
        self.options.explicit = Some(ExplicitBackend((reader, writer)));
        self
    }

    /// Sets the log file size in kilobytes.
    pub fn file_size_kb(mut self, kb: u64) -> Self {
        self.options.file_size_kb = NonZeroU64::new(kb);
        self
    }

    /// Sets the lock acquisition timeout.
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.options.lock_timeout_ms = millis(timeout);
        self
    }

    /// Sets whether the directory lock is ignored.
    pub fn lock_ignored(mut self, value: bool) -> Self {
        self.options.lock_ignored = value;
        self
    }

    /// Sets the absolute log cache size in bytes.
    pub fn memory_usage(mut self, bytes: u64) -> Self {
        self.options.memory_usage = NonZeroU64::new(bytes);
        self
    }

    /// Sets the log cache share of the memory budget, in percent.
    pub fn memory_usage_percentage(mut self, percentage: u32) -> Self {
        self.options.memory_usage_percentage = NonZeroU32::new(percentage);
        self
    }

    /// Sets whether every commit is synced.
    pub fn durable_write(mut self, value: bool) -> Self {
        self.options.durable_write = value;
        self
    }

    /// Sets whether the log cache is shared.
    pub fn shared_cache(mut self, value: bool) -> Self {
        self.options.shared_cache = value;
        self
    }

    /// Sets whether the log cache is non-blocking.
    pub fn non_blocking_cache(mut self, value: bool) -> Self {
        self.options.non_blocking_cache = value;
        self
    }

    /// Sets the number of cache generations.
    pub fn cache_generation_count(mut self, count: u32) -> Self {
        self.options.cache_generation_count = NonZeroU32::new(count);
        self
    }

    /// Sets the cache read-ahead multiple.
    pub fn cache_read_ahead_multiple(mut self, multiple: u32) -> Self {
        self.options.cache_read_ahead_multiple = NonZeroU32::new(multiple);
        self
    }

    /// Sets the cache page size in bytes.
    pub fn cache_page_size(mut self, size: u32) -> Self {
        self.options.cache_page_size = NonZeroU32::new(size);
        self
    }

    /// Sets the number of files the cache keeps open.
    pub fn cache_open_files_count(mut self, count: u32) -> Self {
        self.options.cache_open_files_count = NonZeroU32::new(count);
        self
    }

    /// Sets whether the log directory must be empty on open.
    pub fn clean_directory_expected(mut self, value: bool) -> Self {
        self.options.clean_directory_expected = value;
        self
    }

    /// Sets whether an invalid log is cleared on open.
    pub fn clear_invalid_log(mut self, value: bool) -> Self {
        self.options.clear_invalid_log = value;
        self
    }

    /// Sets the background sync period.
    pub fn sync_period(mut self, period: Duration) -> Self {
        self.options.sync_period_ms = NonZeroU64::new(millis(period));
        self
    }

    /// Sets whether full log files become read-only.
    pub fn full_file_readonly(mut self, value: bool) -> Self {
        self.options.full_file_readonly = value;
        self
    }

    /// Encrypts the log with `provider` and `key`.
    pub fn cipher(
        mut self,
        provider: Arc<dyn StreamCipherProvider>,
        key: impl Into<CipherKey>,
        basic_iv: u64,
    ) -> Self {
        self.options.cipher_provider = Some(provider);
        self.options.cipher_key = Some(key.into());
        self.options.cipher_basic_iv = basic_iv;
        self
    }

    /// Finishes building.
    #[must_use]
    pub fn build(self) -> LogOptions {
        self.options
    }
}

/// A resolved backend: the reader/writer pair and the provider that made
/// it, if any.
///
/// The holder owns closing the pair.
#[derive(Clone)]
pub struct OpenedBackend {
    reader: Arc<dyn DataReader>,
    writer: Arc<dyn DataWriter>,
    provider: Option<Arc<dyn ReaderWriterProvider>>,
}

impl OpenedBackend {
    pub(crate) fn new(
        reader: Arc<dyn DataReader>,
        writer: Arc<dyn DataWriter>,
        provider: Option<Arc<dyn ReaderWriterProvider>>,
    ) -> Self {
        Self {
            reader,
            writer,
            provider,
        }
    }

    /// Returns the reader.
    #[must_use]
    pub fn reader(&self) -> &Arc<dyn DataReader> {
        &self.reader
    }

    /// Returns the writer.
    #[must_use]
    pub fn writer(&self) -> &Arc<dyn DataWriter> {
        &self.writer
    }

    /// Returns the provider, or `None` for an explicit pair without a
    /// backend name.
    #[must_use]
    pub fn provider(&self) -> Option<&Arc<dyn ReaderWriterProvider>> {
        self.provider.as_ref()
    }

    /// Returns true if the provider only supports reading.
    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_readonly())
    }

    /// Splits into the reader and writer.
    #[must_use]
    pub fn into_parts(self) -> ReaderWriter {
        (self.reader, self.writer)
    }
}

impl fmt::Debug for OpenedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenedBackend")
            .field("location", &self.reader.location())
            .field("provider", &self.provider)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lode_io::{InMemoryBackend, FILE_READONLY_PROVIDER, MEMORY_PROVIDER};

    struct Plain;

    impl StreamCipherProvider for Plain {
        fn id(&self) -> &str {
            "plain"
        }
    }

    #[test]
    fn unset_values_fall_back_to_defaults() {
        let options = LogOptions::default();
        let defaults = LogDefaults::default();

        assert_eq!(options.file_size_kb(&defaults), 1024);
        assert_eq!(options.memory_usage_percentage(&defaults), 50);
        assert_eq!(options.cache_page_size(&defaults), defaults.cache_page_size);
        assert_eq!(options.sync_period(&defaults), defaults.sync_period());
        assert_eq!(options.lock_timeout(), Duration::ZERO);
        assert_eq!(options.memory_usage(), None);
    }

    #[test]
    fn zero_leaves_setting_unset() {
        let options = LogOptions::builder()
            .file_size_kb(0)
            .cache_generation_count(0)
            .sync_period(Duration::ZERO)
            .build();
        let defaults = LogDefaults::default().with_cache_generation_count(5);

        assert_eq!(options.file_size_kb(&defaults), 1024);
        assert_eq!(options.cache_generation_count(&defaults), 5);
        assert_eq!(options.sync_period(&defaults), defaults.sync_period());
    }

    #[test]
    fn builder_sets_values() {
        let options = LogOptions::builder()
            .location("/var/log/lode")
            .backend("file")
            .file_size_kb(4096)
            .durable_write(true)
            .cache_page_size(4096)
            .lock_timeout(Duration::from_millis(250))
            .build();
        let defaults = LogDefaults::default();

        assert_eq!(options.location(), Some("/var/log/lode"));
        assert_eq!(options.backend_name(), Some("file"));
        assert_eq!(options.file_size_kb(&defaults), 4096);
        assert!(options.is_durable_write());
        assert_eq!(options.cache_page_size(&defaults), 4096);
        assert_eq!(options.lock_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn memory_policy_reports_conflict() {
        assert_eq!(
            LogOptions::default().memory_usage_policy(),
            MemoryUsagePolicy::Unset
        );
        assert_eq!(
            LogOptions::builder().memory_usage(1 << 20).build().memory_usage_policy(),
            MemoryUsagePolicy::Absolute(1 << 20)
        );
        assert_eq!(
            LogOptions::builder()
                .memory_usage(1 << 20)
                .memory_usage_percentage(30)
                .build()
                .memory_usage_policy(),
            MemoryUsagePolicy::Conflicting {
                bytes: 1 << 20,
                percentage: 30
            }
        );
    }

    #[test]
    fn json_round_trip_keeps_settings() {
        let json = r#"{
            "location": "/data/log",
            "backend": "file",
            "file_size_kb": 8192,
            "sync_period_ms": 500,
            "durable_write": true
        }"#;
        let options = LogOptions::from_json(json).unwrap();
        let defaults = LogDefaults::default();

        assert_eq!(options.location(), Some("/data/log"));
        assert_eq!(options.file_size_kb(&defaults), 8192);
        assert_eq!(options.sync_period(&defaults), Duration::from_millis(500));
        assert!(options.is_durable_write());
        assert_eq!(options.memory_usage_percentage(&defaults), 50);

        let reparsed = LogOptions::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(reparsed.file_size_kb(&defaults), 8192);
    }

    #[test]
    fn json_rejects_zero_and_garbage() {
        let result = LogOptions::from_json(r#"{ "file_size_kb": 0 }"#);
        assert!(matches!(result, Err(LogError::InvalidSetting { .. })));

        let result = LogOptions::from_json("not json");
        assert!(matches!(result, Err(LogError::InvalidSetting { .. })));
    }

    #[test]
    fn resolve_through_registry() {
        let registry = ProviderRegistry::with_builtin();
        let options = LogOptions::builder()
            .location("mem:resolve")
            .backend(MEMORY_PROVIDER)
            .build();

        let opened = options.resolve(&registry).unwrap();
        assert_eq!(opened.reader().location(), "mem:resolve");
        assert_eq!(opened.provider().unwrap().name(), MEMORY_PROVIDER);
        assert!(!opened.is_readonly());

        opened.writer().append(b"abc").unwrap();
        assert_eq!(opened.reader().read_at(0, 3).unwrap(), b"abc");
    }

    #[test]
    fn resolve_errors() {
        let registry = ProviderRegistry::with_builtin();

        let result = LogOptions::builder().backend(MEMORY_PROVIDER).build().resolve(&registry);
        assert!(matches!(result, Err(LogError::MissingLocation)));

        let result = LogOptions::default().resolve(&registry);
        assert!(matches!(result, Err(LogError::MissingLocation)));

        let result = LogOptions::builder().location("x").build().resolve(&registry);
        assert!(matches!(result, Err(LogError::NoBackend)));

        let result = LogOptions::builder()
            .location("x")
            .backend("s3")
            .build()
            .resolve(&registry);
        assert!(matches!(result, Err(LogError::UnknownProvider { name }) if name == "s3"));
    }

    #[test]
    fn resolve_prefers_explicit_pair() {
        let backend = Arc::new(InMemoryBackend::new("mem:explicit"));
        let reader: Arc<dyn DataReader> = backend.clone();
        let writer: Arc<dyn DataWriter> = backend;

        let options = LogOptions::builder()
            .reader_writer(Arc::clone(&reader), Arc::clone(&writer))
            .build();
        assert!(options.has_explicit_backend());

        let opened = options.resolve(&ProviderRegistry::new()).unwrap();
        assert!(Arc::ptr_eq(opened.reader(), &reader));
        assert!(Arc::ptr_eq(opened.writer(), &writer));
        assert!(opened.provider().is_none());
    }

    #[test]
    fn explicit_pair_still_reports_readonly_provider() {
        let backend = Arc::new(InMemoryBackend::new("mem"));
        let options = LogOptions::builder()
            .backend(FILE_READONLY_PROVIDER)
            .reader_writer(backend.clone(), backend)
            .build();

        let opened = options.resolve(&ProviderRegistry::with_builtin()).unwrap();
        assert!(opened.is_readonly());
    }

    #[test]
    fn cipher_settings_must_be_complete() {
        let registry = ProviderRegistry::with_builtin();
        let mut options = LogOptions::builder()
            .location("mem")
            .backend(MEMORY_PROVIDER)
            .build();
        options.cipher_provider = Some(Arc::new(Plain));

        let result = options.resolve(&registry);
        assert!(matches!(result, Err(LogError::InvalidSetting { .. })));

        let options = LogOptions::builder()
            .location("mem")
            .backend(MEMORY_PROVIDER)
            .cipher(Arc::new(Plain), vec![1u8; 32], 99)
            .build();
        assert!(options.is_encrypted());
        assert_eq!(options.cipher().unwrap().basic_iv(), 99);
        assert!(options.resolve(&registry).is_ok());
    }
}
