//! Show command implementation.

use super::ConfigSource;
use lode_log::{LogConfig, MemoryUsagePolicy};
use serde::Serialize;
use std::time::Duration;

/// Effective log settings after defaults are applied.
#[derive(Debug, Serialize)]
pub struct EffectiveSettings {
    /// Backend location.
    pub location: Option<String>,
    /// Backend provider name.
    pub backend: Option<String>,
    /// Log file size in kilobytes.
    pub file_size_kb: u64,
    /// Lock timeout in milliseconds.
    pub lock_timeout_ms: u64,
    /// Whether the directory lock is ignored.
    pub lock_ignored: bool,
    /// Absolute cache size in bytes (0 if unset).
    pub memory_usage: u64,
    /// Cache share of the memory budget.
    pub memory_usage_percentage: u32,
    /// Whether both memory settings were given.
    pub memory_conflict: bool,
    /// Whether every commit is synced.
    pub durable_write: bool,
    /// Whether the cache is shared.
    pub shared_cache: bool,
    /// Whether the cache is non-blocking.
    pub non_blocking_cache: bool,
    /// Cache generations.
    pub cache_generation_count: u32,
    /// Cache read-ahead multiple.
    pub cache_read_ahead_multiple: u32,
    /// Cache page size in bytes.
    pub cache_page_size: u32,
    /// Files kept open by the cache.
    pub cache_open_files_count: u32,
    /// Whether the directory must be empty on open.
    pub clean_directory_expected: bool,
    /// Whether an invalid log is cleared on open.
    pub clear_invalid_log: bool,
    /// Sync period in milliseconds.
    pub sync_period_ms: u64,
    /// Whether full files become read-only.
    pub full_file_readonly: bool,
    /// Whether the log is encrypted.
    pub encrypted: bool,
}

impl EffectiveSettings {
    /// Collects the effective settings of `config`.
    pub fn from_config(config: &LogConfig) -> Self {
        Self {
            location: config.location().map(str::to_string),
            backend: config.backend_name().map(str::to_string),
            file_size_kb: config.file_size(),
            lock_timeout_ms: millis(config.lock_timeout()),
            lock_ignored: config.is_lock_ignored(),
            memory_usage: config.memory_usage(),
            memory_usage_percentage: config.memory_usage_percentage(),
            memory_conflict: matches!(
                config.memory_usage_policy(),
                MemoryUsagePolicy::Conflicting { .. }
            ),
            durable_write: config.is_durable_write(),
            shared_cache: config.is_shared_cache(),
            non_blocking_cache: config.is_non_blocking_cache(),
            cache_generation_count: config.cache_generation_count(),
            cache_read_ahead_multiple: config.cache_read_ahead_multiple(),
            cache_page_size: config.cache_page_size(),
            cache_open_files_count: config.cache_open_files_count(),
            clean_directory_expected: config.is_clean_directory_expected(),
            clear_invalid_log: config.is_clear_invalid_log(),
            sync_period_ms: millis(config.sync_period()),
            full_file_readonly: config.is_full_file_readonly(),
            encrypted: config.is_encrypted(),
        }
    }
}

/// Runs the show command.
pub fn run(source: &ConfigSource, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = source.load()?;
    let settings = EffectiveSettings::from_config(&config);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        _ => {
            print_text_output(&settings);
        }
    }

    Ok(())
}

fn print_text_output(s: &EffectiveSettings) {
    println!("Lode Log Settings");
    println!("=================");
    println!();
    println!("Backend:");
    println!("  Location:  {}", s.location.as_deref().unwrap_or("(not set)"));
    println!("  Provider:  {}", s.backend.as_deref().unwrap_or("(not set)"));
    println!("  File size: {}", format_size(s.file_size_kb * 1024));
    println!("  Encrypted: {}", s.encrypted);
    println!();
    println!("Durability:");
    println!("  Durable write:      {}", s.durable_write);
    println!("  Sync period:        {} ms", s.sync_period_ms);
    println!("  Full file readonly: {}", s.full_file_readonly);
    println!("  Lock timeout:       {} ms", s.lock_timeout_ms);
    println!("  Lock ignored:       {}", s.lock_ignored);
    println!();
    println!("Cache:");
    if s.memory_usage > 0 {
        println!("  Memory usage:      {}", format_size(s.memory_usage));
    }
    println!("  Memory percentage: {}%", s.memory_usage_percentage);
    if s.memory_conflict {
        println!("  (both memory usage and percentage are set)");
    }
    println!("  Page size:         {}", format_size(u64::from(s.cache_page_size)));
    println!("  Generations:       {}", s.cache_generation_count);
    println!("  Read-ahead:        {}x", s.cache_read_ahead_multiple);
    println!("  Open files:        {}", s.cache_open_files_count);
    println!("  Shared:            {}", s.shared_cache);
    println!("  Non-blocking:      {}", s.non_blocking_cache);
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
