//! Fallback values for unset log settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default log file size in kilobytes.
pub const DEFAULT_FILE_SIZE_KB: u64 = 1024;
/// Default share of the memory budget used by the log cache, in percent.
pub const DEFAULT_MEMORY_USAGE_PERCENTAGE: u32 = 50;
/// Default number of log cache generations.
pub const DEFAULT_CACHE_GENERATION_COUNT: u32 = 2;
/// Default read-ahead multiple of the log cache.
pub const DEFAULT_CACHE_READ_AHEAD_MULTIPLE: u32 = 1;
/// Default log cache page size in bytes.
pub const DEFAULT_CACHE_PAGE_SIZE: u32 = 64 * 1024;
/// Default number of log files the cache keeps open.
pub const DEFAULT_CACHE_OPEN_FILES_COUNT: u32 = 16;
/// Default period between background syncs, in milliseconds.
pub const DEFAULT_SYNC_PERIOD_MS: u64 = 10_000;

/// Values used in place of settings that were never configured.
///
/// The composing engine builds one of these (usually from its own
/// configuration) and passes it to the options accessors, so the log layer
/// never consults a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogDefaults {
    /// Log file size in kilobytes.
    pub file_size_kb: u64,

    /// Share of the memory budget for the log cache, in percent.
    pub memory_usage_percentage: u32,

    /// Number of log cache generations.
    pub cache_generation_count: u32,

    /// Read-ahead multiple of the log cache.
    pub cache_read_ahead_multiple: u32,

    /// Log cache page size in bytes.
    pub cache_page_size: u32,

    /// Number of log files the cache keeps open.
    pub cache_open_files_count: u32,

    /// Period between background syncs, in milliseconds.
    pub sync_period_ms: u64,
}

impl Default for LogDefaults {
    fn default() -> Self {
        Self {
            file_size_kb: DEFAULT_FILE_SIZE_KB,
            memory_usage_percentage: DEFAULT_MEMORY_USAGE_PERCENTAGE,
            cache_generation_count: DEFAULT_CACHE_GENERATION_COUNT,
            cache_read_ahead_multiple: DEFAULT_CACHE_READ_AHEAD_MULTIPLE,
            cache_page_size: DEFAULT_CACHE_PAGE_SIZE,
            cache_open_files_count: DEFAULT_CACHE_OPEN_FILES_COUNT,
            sync_period_ms: DEFAULT_SYNC_PERIOD_MS,
        }
    }
}

impl LogDefaults {
    /// Creates the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sync period as a [`Duration`].
    #[must_use]
    pub const fn sync_period(&self) -> Duration {
        Duration::from_millis(self.sync_period_ms)
    }

    /// Sets the cache page size.
    #[must_use]
    pub const fn with_cache_page_size(mut self, size: u32) -> Self {
        self.cache_page_size = size;
        self
    }

    /// Sets the sync period.
    #[must_use]
    pub const fn with_sync_period_ms(mut self, ms: u64) -> Self {
        self.sync_period_ms = ms;
        self
    }

    /// Sets the cache generation count.
    #[must_use]
    pub const fn with_cache_generation_count(mut self, count: u32) -> Self {
        self.cache_generation_count = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults() {
        let defaults = LogDefaults::default();
        assert_eq!(defaults.file_size_kb, 1024);
        assert_eq!(defaults.memory_usage_percentage, 50);
        assert_eq!(defaults.sync_period(), Duration::from_secs(10));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let defaults: LogDefaults =
            serde_json::from_str(r#"{ "cache_page_size": 4096 }"#).unwrap();
        assert_eq!(defaults.cache_page_size, 4096);
        assert_eq!(defaults.cache_open_files_count, DEFAULT_CACHE_OPEN_FILES_COUNT);
    }
}
