//! Log configuration with lazy backend resolution.
//!
//! [`LogConfig`] is filled in through `set_*` calls during engine setup and
//! then shared. The first call to [`LogConfig::reader`],
//! [`LogConfig::writer`] or [`LogConfig::provider`] resolves the backend
//! through the provider registry; the result is cached for the lifetime
//! of the configuration.
//!
//! ```text
//! setup (&mut self)          shared (&self)
//! ─────────────────          ───────────────────────────────────────
//! set_location ─┐            provider() ── registry lookup (once)
//! set_backend ──┼──────────▶ reader()   ─┐
//! set_file_size ┘            writer()   ─┴─ provider factory (once)
//! ```

use crate::cipher::{CipherKey, CipherSettings, StreamCipherProvider};
use crate::defaults::LogDefaults;
use crate::error::LogResult;
use crate::options::{millis, ExplicitBackend, LogOptions, MemoryUsagePolicy, OpenedBackend};
use lode_io::{DataReader, DataWriter, ProviderRegistry, ReaderWriter, ReaderWriterProvider};
use parking_lot::Mutex;
use std::fmt;
use std::num::{NonZeroU32, NonZeroU64};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Configuration of how the log is persisted.
///
/// # Resolution
///
/// - [`provider`](Self::provider) looks the backend name up in the
///   registry on first use and caches the result. An unknown name fails
///   then, not when it is set.
/// - [`reader`](Self::reader) and [`writer`](Self::writer) return the
///   explicit pair if one was set, otherwise ask the provider for a pair
///   bound to the location. The factory runs at most once per
///   configuration, even when several threads race on first access.
/// - Once resolved, the pair never changes. Later `set_location` or
///   `set_backend_name` calls do not re-resolve.
///
/// # Defaults
///
/// Numeric getters substitute the configured [`LogDefaults`] for settings
/// that were never set (or were set to zero).
///
/// # Example
///
/// ```rust
/// use lode_log::LogConfig;
///
/// let mut config = LogConfig::new();
/// config
///     .set_location("mem:example")
///     .set_backend_name("memory")
///     .set_durable_write(true);
///
/// assert_eq!(config.file_size(), 1024);
/// let writer = config.writer().unwrap();
/// writer.append(b"record").unwrap();
/// ```
pub struct LogConfig {
    options: LogOptions,
    defaults: LogDefaults,
    registry: Arc<ProviderRegistry>,
    provider: Mutex<Option<Arc<dyn ReaderWriterProvider>>>,
    reader_writer: Mutex<Option<ReaderWriter>>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_options(
            LogOptions::default(),
            ProviderRegistry::builtin(),
            LogDefaults::default(),
        )
    }
}

impl LogConfig {
    /// Creates an empty configuration using the built-in providers and
    /// defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty configuration resolving backends through
    /// `registry`.
    #[must_use]
    pub fn with_registry(registry: Arc<ProviderRegistry>) -> Self {
        Self::from_options(LogOptions::default(), registry, LogDefaults::default())
    }

    /// Wraps existing options.
    #[must_use]
    pub fn from_options(
        options: LogOptions,
        registry: Arc<ProviderRegistry>,
        defaults: LogDefaults,
    ) -> Self {
        Self {
            options,
            defaults,
            registry,
            provider: Mutex::new(None),
            reader_writer: Mutex::new(None),
        }
    }

    /// Creates a configuration with an explicit reader and writer.
    #[must_use]
    pub fn create(reader: Arc<dyn DataReader>, writer: Arc<dyn DataWriter>) -> Self {
        let mut config = Self::new();
        config.set_reader_writer(reader, writer);
        config
    }

    /// Replaces the fallback values for unset settings.
    pub fn set_defaults(&mut self, defaults: LogDefaults) -> &mut Self {
        self.defaults = defaults;
        self
    }

    /// Returns the fallback values for unset settings.
    #[must_use]
    pub fn defaults(&self) -> &LogDefaults {
        &self.defaults
    }

    /// Returns the provider registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Returns the raw options.
    #[must_use]
    pub fn options(&self) -> &LogOptions {
        &self.options
    }

    /// Snapshots the settings as immutable options. A resolved pair is
    /// carried over as an explicit pair.
    #[must_use]
    pub fn to_options(&self) -> LogOptions {
        let mut options = self.options.clone();
        if let Some(pair) = self.reader_writer.lock().as_ref() {
            options.explicit = Some(ExplicitBackend(pair.clone()));
        }
        options
    }

    // ------------------------------------------------------------------
    // Backend
    // ------------------------------------------------------------------

    /// Sets the backend location.
    pub fn set_location(&mut self, location: impl Into<String>) -> &mut Self {
        self.options.location = Some(location.into());
        self
    }

    /// Returns the backend location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.options.location()
    }

    /// Records the backend provider name. It is looked up on first use.
    pub fn set_backend_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.options.backend = Some(name.into());
        self
    }

    /// Same as [`set_backend_name`](Self::set_backend_name).
    pub fn set_reader_writer_provider(&mut self, name: impl Into<String>) -> &mut Self {
        self.set_backend_name(name)
    }

    /// Returns the backend provider name.
    #[must_use]
    pub fn backend_name(&self) -> Option<&str> {
        self.options.backend_name()
    }

    /// Supplies the reader and writer directly, bypassing providers.
    ///
    /// Ignored (with a warning) if the pair was already resolved or an
    /// explicit pair was already supplied.
    pub fn set_reader_writer(
        &mut self,
        reader: Arc<dyn DataReader>,
        writer: Arc<dyn DataWriter>,
    ) -> &mut Self {
        if self.options.explicit.is_some() || self.reader_writer.get_mut().is_some() {
            warn!(
                location = reader.location(),
                "log reader and writer already resolved, ignoring explicit pair"
            );
            return self;
        }
        self.options.explicit = Some(ExplicitBackend((reader, writer)));
        self
    }

    /// Returns the provider named by the backend name.
    ///
    /// Returns `Ok(None)` if no backend name was set. The lookup happens
    /// once; later calls return the cached provider.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::UnknownProvider`](crate::LogError::UnknownProvider)
    /// if the name is not registered.
    pub fn provider(&self) -> LogResult<Option<Arc<dyn ReaderWriterProvider>>> {
        let mut cached = self.provider.lock();
        if let Some(provider) = cached.as_ref() {
            return Ok(Some(Arc::clone(provider)));
        }

        let provider = self.options.lookup_provider(&self.registry)?;
        *cached = provider.clone();
        Ok(provider)
    }

    /// Returns true if the resolved provider only supports reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend name is not registered.
    pub fn is_readonly_backend(&self) -> LogResult<bool> {
        Ok(self.provider()?.is_some_and(|p| p.is_readonly()))
    }

    fn reader_writer(&self) -> LogResult<ReaderWriter> {
        // Held across the factory call so concurrent first callers wait
        // for one resolution instead of opening their own backend.
        let mut cached = self.reader_writer.lock();
        if let Some(pair) = cached.as_ref() {
            return Ok(pair.clone());
        }

        let pair = match &self.options.explicit {
            Some(explicit) => explicit.0.clone(),
            None => self.options.open_pair(|| self.provider())?,
        };
        *cached = Some(pair.clone());
        Ok(pair)
    }

    /// Returns the log reader, resolving the backend on first use.
    ///
    /// # Errors
    ///
    /// - [`LogError::MissingLocation`](crate::LogError::MissingLocation) if
    ///   no location is set
    /// - [`LogError::UnknownProvider`](crate::LogError::UnknownProvider) if
    ///   the backend name is not registered
    /// - [`LogError::NoBackend`](crate::LogError::NoBackend) if there is
    ///   neither a backend name nor an explicit pair
    /// - [`LogError::Backend`](crate::LogError::Backend) if the provider
    ///   fails to open the backend
    pub fn reader(&self) -> LogResult<Arc<dyn DataReader>> {
        Ok(self.reader_writer()?.0)
    }

    /// Returns the log writer, resolving the backend on first use.
    ///
    /// # Errors
    ///
    /// Same as [`reader`](Self::reader).
    pub fn writer(&self) -> LogResult<Arc<dyn DataWriter>> {
        Ok(self.reader_writer()?.1)
    }

    /// Resolves the backend and returns it together with its provider.
    ///
    /// # Errors
    ///
    /// Same as [`reader`](Self::reader), plus
    /// [`LogError::InvalidSetting`](crate::LogError::InvalidSetting) for
    /// incomplete cipher settings.
    pub fn open(&self) -> LogResult<OpenedBackend> {
        self.options.validate()?;
        let (reader, writer) = self.reader_writer()?;
        Ok(OpenedBackend::new(reader, writer, self.provider()?))
    }

    // ------------------------------------------------------------------
    // Files and locking
    // ------------------------------------------------------------------

    /// Sets the log file size in kilobytes. Zero means the default.
    pub fn set_file_size(&mut self, kb: u64) -> &mut Self {
        self.options.file_size_kb = NonZeroU64::new(kb);
        self
    }

    /// Log file size in kilobytes.
    #[must_use]
    pub fn file_size(&self) -> u64 {
        self.options.file_size_kb(&self.defaults)
    }

    /// Sets the lock acquisition timeout.
    pub fn set_lock_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.options.lock_timeout_ms = millis(timeout);
        self
    }

    /// Lock acquisition timeout. Interpreted by the locking component.
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        self.options.lock_timeout()
    }

    /// Sets whether the directory lock is ignored.
    pub fn set_lock_ignored(&mut self, value: bool) -> &mut Self {
        self.options.lock_ignored = value;
        self
    }

    /// Whether the directory lock is ignored.
    #[must_use]
    pub fn is_lock_ignored(&self) -> bool {
        self.options.is_lock_ignored()
    }

    /// Sets whether every commit is synced.
    pub fn set_durable_write(&mut self, value: bool) -> &mut Self {
        self.options.durable_write = value;
        self
    }

    /// Whether every commit is synced.
    #[must_use]
    pub fn is_durable_write(&self) -> bool {
        self.options.is_durable_write()
    }

    /// Sets whether the log directory must be empty on open.
    pub fn set_clean_directory_expected(&mut self, value: bool) -> &mut Self {
        self.options.clean_directory_expected = value;
        self
    }

    /// Whether the log directory must be empty on open.
    #[must_use]
    pub fn is_clean_directory_expected(&self) -> bool {
        self.options.is_clean_directory_expected()
    }

    /// Sets whether an invalid log is cleared on open.
    pub fn set_clear_invalid_log(&mut self, value: bool) -> &mut Self {
        self.options.clear_invalid_log = value;
        self
    }

    /// Whether an invalid log is cleared on open.
    #[must_use]
    pub fn is_clear_invalid_log(&self) -> bool {
        self.options.is_clear_invalid_log()
    }

    /// Sets the background sync period. Zero means the default.
    pub fn set_sync_period(&mut self, period: Duration) -> &mut Self {
        self.options.sync_period_ms = NonZeroU64::new(millis(period));
        self
    }

    /// Period between background syncs.
    #[must_use]
    pub fn sync_period(&self) -> Duration {
        self.options.sync_period(&self.defaults)
    }

    /// Sets whether full log files become read-only.
    pub fn set_full_file_readonly(&mut self, value: bool) -> &mut Self {
        self.options.full_file_readonly = value;
        self
    }

    /// Whether full log files become read-only.
    #[must_use]
    pub fn is_full_file_readonly(&self) -> bool {
        self.options.is_full_file_readonly()
    }

    // ------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------

    /// Sets the absolute log cache size in bytes. Zero means unset.
    pub fn set_memory_usage(&mut self, bytes: u64) -> &mut Self {
        self.options.memory_usage = NonZeroU64::new(bytes);
        self
    }

    /// Absolute log cache size in bytes, or 0 if unset.
    #[must_use]
    pub fn memory_usage(&self) -> u64 {
        self.options.memory_usage().unwrap_or(0)
    }

    /// Sets the log cache share of the memory budget. Zero means the
    /// default.
    pub fn set_memory_usage_percentage(&mut self, percentage: u32) -> &mut Self {
        self.options.memory_usage_percentage = NonZeroU32::new(percentage);
        self
    }

    /// Log cache share of the memory budget, in percent.
    #[must_use]
    pub fn memory_usage_percentage(&self) -> u32 {
        self.options.memory_usage_percentage(&self.defaults)
    }

    /// Reports which memory settings were configured.
    #[must_use]
    pub fn memory_usage_policy(&self) -> MemoryUsagePolicy {
        self.options.memory_usage_policy()
    }

    /// Sets whether the log cache is shared.
    pub fn set_shared_cache(&mut self, value: bool) -> &mut Self {
        self.options.shared_cache = value;
        self
    }

    /// Whether the log cache is shared.
    #[must_use]
    pub fn is_shared_cache(&self) -> bool {
        self.options.is_shared_cache()
    }

    /// Sets whether the log cache is non-blocking.
    pub fn set_non_blocking_cache(&mut self, value: bool) -> &mut Self {
        self.options.non_blocking_cache = value;
        self
    }

    /// Whether the log cache is non-blocking.
    #[must_use]
    pub fn is_non_blocking_cache(&self) -> bool {
        self.options.is_non_blocking_cache()
    }

    /// Sets the number of cache generations. Zero means the default.
    pub fn set_cache_generation_count(&mut self, count: u32) -> &mut Self {
        self.options.cache_generation_count = NonZeroU32::new(count);
        self
    }

    /// Number of cache generations.
    #[must_use]
    pub fn cache_generation_count(&self) -> u32 {
        self.options.cache_generation_count(&self.defaults)
    }

    /// Sets the cache read-ahead multiple. Zero means the default.
    pub fn set_cache_read_ahead_multiple(&mut self, multiple: u32) -> &mut Self {
        self.options.cache_read_ahead_multiple = NonZeroU32::new(multiple);
        self
    }

    /// Cache read-ahead multiple.
    #[must_use]
    pub fn cache_read_ahead_multiple(&self) -> u32 {
        self.options.cache_read_ahead_multiple(&self.defaults)
    }

    /// Sets the cache page size in bytes. Zero means the default.
    pub fn set_cache_page_size(&mut self, size: u32) -> &mut Self {
        self.options.cache_page_size = NonZeroU32::new(size);
        self
    }

    /// Cache page size in bytes.
    #[must_use]
    pub fn cache_page_size(&self) -> u32 {
        self.options.cache_page_size(&self.defaults)
    }

    /// Sets the number of files the cache keeps open. Zero means the
    /// default.
    pub fn set_cache_open_files_count(&mut self, count: u32) -> &mut Self {
        self.options.cache_open_files_count = NonZeroU32::new(count);
        self
    }

    /// Number of files the cache keeps open.
    #[must_use]
    pub fn cache_open_files_count(&self) -> u32 {
        self.options.cache_open_files_count(&self.defaults)
    }

    // ------------------------------------------------------------------
    // Encryption
    // ------------------------------------------------------------------

    /// Sets the stream cipher.
    pub fn set_cipher_provider(&mut self, provider: Arc<dyn StreamCipherProvider>) -> &mut Self {
        self.options.cipher_provider = Some(provider);
        self
    }

    /// Returns the stream cipher, if set.
    #[must_use]
    pub fn cipher_provider(&self) -> Option<&Arc<dyn StreamCipherProvider>> {
        self.options.cipher_provider()
    }

    /// Sets the cipher key.
    pub fn set_cipher_key(&mut self, key: impl Into<CipherKey>) -> &mut Self {
        self.options.cipher_key = Some(key.into());
        self
    }

    /// Returns the cipher key, if set.
    #[must_use]
    pub fn cipher_key(&self) -> Option<&CipherKey> {
        self.options.cipher_key()
    }

    /// Sets the basic IV.
    pub fn set_cipher_basic_iv(&mut self, basic_iv: u64) -> &mut Self {
        self.options.cipher_basic_iv = basic_iv;
        self
    }

    /// Returns the basic IV.
    #[must_use]
    pub fn cipher_basic_iv(&self) -> u64 {
        self.options.cipher_basic_iv()
    }

    /// Returns the cipher configuration when both a cipher and a key are
    /// set.
    #[must_use]
    pub fn cipher(&self) -> Option<CipherSettings> {
        self.options.cipher()
    }

    /// Returns true if the log is encrypted.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.options.is_encrypted()
    }
}

impl fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogConfig")
            .field("options", &self.options)
            .field("defaults", &self.defaults)
            .field("registry", &self.registry)
            .field("resolved", &self.reader_writer.lock().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use lode_io::{InMemoryBackend, IoResult, MemoryProvider, MEMORY_PROVIDER};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    /// Counts factory invocations.
    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl ReaderWriterProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn new_reader_writer(&self, location: &str) -> IoResult<ReaderWriter> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Widen the race window
            std::thread::sleep(Duration::from_millis(20));
            MemoryProvider.new_reader_writer(location)
        }
    }

    fn counting_config() -> (LogConfig, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider::default());
        let mut registry = ProviderRegistry::new();
        registry.register(provider.clone());
        let mut config = LogConfig::with_registry(Arc::new(registry));
        config.set_location("mem:counting").set_backend_name("counting");
        (config, provider)
    }

    #[test]
    fn untouched_defaults() {
        let config = LogConfig::new();
        assert_eq!(config.file_size(), 1024);
        assert_eq!(config.memory_usage_percentage(), 50);
        assert_eq!(config.memory_usage(), 0);
        assert_eq!(config.lock_timeout(), Duration::ZERO);
        assert_eq!(config.cache_generation_count(), 2);
        assert_eq!(config.cache_read_ahead_multiple(), 1);
        assert_eq!(config.cache_page_size(), 64 * 1024);
        assert_eq!(config.cache_open_files_count(), 16);
        assert_eq!(config.sync_period(), Duration::from_secs(10));
        assert!(!config.is_durable_write());
        assert!(!config.is_shared_cache());
        assert!(!config.is_non_blocking_cache());
        assert!(!config.is_lock_ignored());
        assert!(!config.is_clean_directory_expected());
        assert!(!config.is_clear_invalid_log());
        assert!(!config.is_full_file_readonly());
        assert!(!config.is_encrypted());
    }

    #[test]
    fn setters_are_fluent() {
        let mut config = LogConfig::new();
        config
            .set_file_size(4096)
            .set_durable_write(true)
            .set_shared_cache(true)
            .set_non_blocking_cache(true)
            .set_lock_timeout(Duration::from_millis(1500))
            .set_lock_ignored(true)
            .set_cache_page_size(4096)
            .set_cache_open_files_count(64)
            .set_sync_period(Duration::from_secs(1))
            .set_full_file_readonly(true)
            .set_clean_directory_expected(true)
            .set_clear_invalid_log(true);

        assert_eq!(config.file_size(), 4096);
        assert!(config.is_durable_write());
        assert!(config.is_shared_cache());
        assert!(config.is_non_blocking_cache());
        assert_eq!(config.lock_timeout(), Duration::from_millis(1500));
        assert!(config.is_lock_ignored());
        assert_eq!(config.cache_page_size(), 4096);
        assert_eq!(config.cache_open_files_count(), 64);
        assert_eq!(config.sync_period(), Duration::from_secs(1));
        assert!(config.is_full_file_readonly());
        assert!(config.is_clean_directory_expected());
        assert!(config.is_clear_invalid_log());
    }

    #[test]
    fn custom_defaults_apply_to_unset_fields() {
        let mut config = LogConfig::new();
        config
            .set_defaults(LogDefaults::default().with_cache_page_size(8192))
            .set_cache_generation_count(3);

        assert_eq!(config.cache_page_size(), 8192);
        assert_eq!(config.cache_generation_count(), 3);
    }

    #[test]
    fn reader_without_location_fails() {
        let config = LogConfig::new();
        assert!(matches!(config.reader(), Err(LogError::MissingLocation)));

        let mut config = LogConfig::new();
        config.set_backend_name(MEMORY_PROVIDER);
        assert!(matches!(config.writer(), Err(LogError::MissingLocation)));
    }

    #[test]
    fn unknown_provider_fails_on_first_use_only() {
        let mut config = LogConfig::new();
        // Recording the name never fails
        config.set_location("somewhere").set_backend_name("s3");

        assert!(matches!(
            config.provider(),
            Err(LogError::UnknownProvider { name }) if name == "s3"
        ));
        assert!(matches!(config.reader(), Err(LogError::UnknownProvider { .. })));
        assert!(config.is_readonly_backend().is_err());
    }

    #[test]
    fn no_backend_name_means_no_provider() {
        let mut config = LogConfig::new();
        config.set_location("somewhere");
        assert!(config.provider().unwrap().is_none());
        assert!(!config.is_readonly_backend().unwrap());
        assert!(matches!(config.reader(), Err(LogError::NoBackend)));
    }

    #[test]
    fn reader_writer_resolved_once() {
        let (config, provider) = counting_config();

        let reader = config.reader().unwrap();
        let writer = config.writer().unwrap();
        let reader_again = config.reader().unwrap();

        assert!(Arc::ptr_eq(&reader, &reader_again));
        assert!(Arc::ptr_eq(&writer, &config.writer().unwrap()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        writer.append(b"shared").unwrap();
        assert_eq!(reader.read_at(0, 6).unwrap(), b"shared");
    }

    #[test]
    fn provider_is_memoized() {
        let (config, _) = counting_config();
        let first = config.provider().unwrap().unwrap();
        let second = config.provider().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn resolution_survives_later_changes() {
        let (mut config, provider) = counting_config();
        let reader = config.reader().unwrap();

        config.set_location("mem:elsewhere").set_backend_name("missing");

        let after = config.reader().unwrap();
        assert!(Arc::ptr_eq(&reader, &after));
        assert_eq!(after.location(), "mem:counting");
        // The provider was cached before the rename
        assert_eq!(config.provider().unwrap().unwrap().name(), "counting");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_pair_bypasses_providers() {
        let backend = Arc::new(InMemoryBackend::new("mem:explicit"));
        let reader: Arc<dyn DataReader> = backend.clone();
        let writer: Arc<dyn DataWriter> = backend;

        let (mut config, provider) = counting_config();
        config.set_reader_writer(Arc::clone(&reader), Arc::clone(&writer));

        assert!(Arc::ptr_eq(&config.reader().unwrap(), &reader));
        assert!(Arc::ptr_eq(&config.writer().unwrap(), &writer));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn create_with_explicit_pair_needs_no_location() {
        let backend = Arc::new(InMemoryBackend::new("mem:create"));
        let config = LogConfig::create(backend.clone(), backend);
        assert_eq!(config.reader().unwrap().location(), "mem:create");
        assert!(config.provider().unwrap().is_none());
    }

    #[test]
    fn explicit_pair_after_resolution_is_ignored() {
        let (mut config, _) = counting_config();
        let reader = config.reader().unwrap();

        let other = Arc::new(InMemoryBackend::new("mem:late"));
        config.set_reader_writer(other.clone(), other);

        assert!(Arc::ptr_eq(&config.reader().unwrap(), &reader));
    }

    #[test]
    fn second_explicit_pair_is_ignored() {
        let first = Arc::new(InMemoryBackend::new("mem:first"));
        let second = Arc::new(InMemoryBackend::new("mem:second"));

        let mut config = LogConfig::create(first.clone(), first);
        config.set_reader_writer(second.clone(), second.clone());
        assert_eq!(config.reader().unwrap().location(), "mem:first");

        let (mut config, provider) = counting_config();
        let third = Arc::new(InMemoryBackend::new("mem:third"));
        config.set_reader_writer(third.clone(), third);
        config.set_reader_writer(second.clone(), second);
        assert_eq!(config.reader().unwrap().location(), "mem:third");
        assert_eq!(config.writer().unwrap().size().unwrap(), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn missing_location_reported_before_unknown_provider() {
        let mut config = LogConfig::new();
        config.set_backend_name("s3");
        assert!(matches!(config.reader(), Err(LogError::MissingLocation)));
        assert!(matches!(
            config.to_options().resolve(&ProviderRegistry::builtin()),
            Err(LogError::MissingLocation)
        ));
    }

    #[test]
    fn concurrent_first_access_builds_one_backend() {
        const THREADS: usize = 8;
        let (config, provider) = counting_config();
        let barrier = Barrier::new(THREADS);

        let readers: Vec<Arc<dyn DataReader>> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        config.reader().unwrap()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        for reader in &readers {
            assert!(Arc::ptr_eq(reader, &readers[0]));
        }
    }

    #[test]
    fn failed_factory_is_not_cached() {
        let mut config = LogConfig::new();
        config.set_location("").set_backend_name(lode_io::FILE_PROVIDER);

        assert!(matches!(config.reader(), Err(LogError::Backend(_))));
        assert!(matches!(config.reader(), Err(LogError::Backend(_))));
    }

    #[test]
    fn open_reports_provider_and_readonly() {
        let (config, _) = counting_config();
        let opened = config.open().unwrap();
        assert_eq!(opened.provider().unwrap().name(), "counting");
        assert!(!opened.is_readonly());
        assert!(Arc::ptr_eq(opened.reader(), &config.reader().unwrap()));
    }

    #[test]
    fn to_options_carries_resolved_pair() {
        let (config, provider) = counting_config();
        let reader = config.reader().unwrap();

        let options = config.to_options();
        assert!(options.has_explicit_backend());

        let opened = options.resolve(config.registry()).unwrap();
        assert!(Arc::ptr_eq(opened.reader(), &reader));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn memory_settings_are_reported_not_resolved() {
        let mut config = LogConfig::new();
        config.set_memory_usage(1 << 30).set_memory_usage_percentage(25);

        assert_eq!(config.memory_usage(), 1 << 30);
        assert_eq!(config.memory_usage_percentage(), 25);
        assert_eq!(
            config.memory_usage_policy(),
            MemoryUsagePolicy::Conflicting {
                bytes: 1 << 30,
                percentage: 25
            }
        );
    }

    #[test]
    fn debug_hides_key_material() {
        let mut config = LogConfig::new();
        config.set_cipher_key(vec![0x5Au8; 16]).set_cipher_basic_iv(42);
        let debug = format!("{config:?}");
        assert!(debug.contains("REDACTED"));
        assert_eq!(config.cipher_basic_iv(), 42);
        // Key without a cipher is not an encrypted log
        assert!(!config.is_encrypted());
        assert!(config.cipher().is_none());
    }
}
