//! Lode CLI
//!
//! Command-line tools for checking how a Lode log would be persisted.
//!
//! # Commands
//!
//! - `providers` - List the registered backend providers
//! - `show` - Display the effective log settings
//! - `probe` - Resolve the backend and report what was opened

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lode log configuration tools.
#[derive(Parser)]
#[command(name = "lode")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with log options
    #[arg(global = true, short, long)]
    options: Option<PathBuf>,

    /// Backend location (overrides the options file)
    #[arg(global = true, short, long)]
    location: Option<String>,

    /// Backend provider name (overrides the options file)
    #[arg(global = true, short, long)]
    backend: Option<String>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered backend providers
    Providers,

    /// Display the effective log settings
    Show {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Resolve the backend and report what was opened
    Probe {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let source = commands::ConfigSource {
        options: cli.options,
        location: cli.location,
        backend: cli.backend,
    };

    match cli.command {
        Commands::Providers => commands::providers::run()?,
        Commands::Show { format } => commands::show::run(&source, &format)?,
        Commands::Probe { format } => commands::probe::run(&source, &format)?,
        Commands::Version => {
            println!("Lode CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Lode Log v{}", lode_log::VERSION);
        }
    }

    Ok(())
}
