//! CLI command implementations.

pub mod probe;
pub mod providers;
pub mod show;

use lode_io::ProviderRegistry;
use lode_log::{LogConfig, LogDefaults, LogOptions};
use std::path::PathBuf;
use tracing::debug;

/// Where the CLI takes log settings from.
#[derive(Debug, Default)]
pub struct ConfigSource {
    /// JSON options file.
    pub options: Option<PathBuf>,
    /// Location override.
    pub location: Option<String>,
    /// Backend name override.
    pub backend: Option<String>,
}

impl ConfigSource {
    /// Builds a configuration from the options file and overrides.
    pub fn load(&self) -> Result<LogConfig, Box<dyn std::error::Error>> {
        let options = match &self.options {
            Some(path) => {
                debug!(path = %path.display(), "loading log options");
                LogOptions::from_json(&std::fs::read_to_string(path)?)?
            }
            None => LogOptions::default(),
        };

        let mut config =
            LogConfig::from_options(options, ProviderRegistry::builtin(), LogDefaults::default());
        if let Some(location) = &self.location {
            config.set_location(location.as_str());
        }
        if let Some(backend) = &self.backend {
            config.set_backend_name(backend.as_str());
        }
        Ok(config)
    }
}
