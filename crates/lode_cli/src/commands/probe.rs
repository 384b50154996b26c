//! Probe command implementation.

use super::ConfigSource;
use serde::Serialize;
use tracing::info;

/// What resolving the backend produced.
#[derive(Debug, Serialize)]
pub struct ProbeResult {
    /// Location the reader is bound to.
    pub location: String,
    /// Provider that opened the backend.
    pub provider: Option<String>,
    /// Whether the provider is read-only.
    pub readonly: bool,
    /// Bytes currently in the log.
    pub size: u64,
}

/// Runs the probe command.
pub fn run(source: &ConfigSource, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = source.load()?;
    info!(
        location = config.location().unwrap_or("-"),
        backend = config.backend_name().unwrap_or("-"),
        "probing log backend"
    );

    let opened = config.open()?;
    let result = ProbeResult {
        location: opened.reader().location().to_string(),
        provider: opened.provider().map(|p| p.name().to_string()),
        readonly: opened.is_readonly(),
        size: opened.reader().size()?,
    };

    // The probe only looks; release what it opened
    opened.writer().close()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            println!("Location: {}", result.location);
            println!("Provider: {}", result.provider.as_deref().unwrap_or("(explicit)"));
            println!("Readonly: {}", result.readonly);
            println!("Size:     {} bytes", result.size);
        }
    }

    Ok(())
}
