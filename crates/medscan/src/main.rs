//! MedScan CLI - medical image analysis over HTTP.
//!
//! MedScan takes a base64-encoded image, captions it, checks that it is a
//! medical image, classifies the imaging modality and asks an LLM for a
//! description and patient precautions.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP service
//! medscan serve --port 5000
//!
//! # Analyze a local file
//! medscan analyze scan.png --pretty
//!
//! # View configuration
//! medscan config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use medscan_core::config::expand_path;
use medscan_core::Config;
use std::path::{Path, PathBuf};

mod cli;
mod logging;
mod server;

/// MedScan - caption, classify and explain medical images.
#[derive(Parser, Debug)]
#[command(name = "medscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to the config file
    #[arg(short, long, global = true, env = "MEDSCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP analysis service
    Serve(cli::serve::ServeArgs),

    /// Analyze a local image file and print the JSON result
    Analyze(cli::analyze::AnalyzeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = Config::resolve_path(cli.config.as_deref());
    let lenient = matches!(
        &cli.command,
        Commands::Config(cli::config::ConfigArgs {
            command: cli::config::ConfigCommand::Init { .. }
        })
    );
    let config = load_config(cli.config.as_deref(), lenient)?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("MedScan v{}", medscan_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Analyze(args) => cli::analyze::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, config_path).await,
    }
}

/// Load the config before logging is up.
///
/// An explicit `--config` path must exist and be valid. The implicit default
/// location falls back to defaults with a warning on stderr, as does `lenient`
/// mode (used by `config init`, which is about to write the file).
fn load_config(explicit: Option<&Path>, lenient: bool) -> anyhow::Result<Config> {
    if let (Some(path), false) = (explicit, lenient) {
        let path = expand_path(path);
        return Config::load_from(&path)
            .with_context(|| format!("Failed to load config file {}", path.display()));
    }

    let path = Config::resolve_path(explicit);
    Ok(Config::load_path(&path).unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config: {e}\n  \
             Using default configuration. Check your config file with `medscan config path`."
        );
        Config::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8080\n\n[limits]\nllm_timeout_ms = 0\n").unwrap();

        let err = load_config(Some(&path), false).unwrap_err();
        assert!(format!("{err:#}").contains("llm_timeout_ms"));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config(Some(&path), false).is_err());
    }

    #[test]
    fn test_explicit_valid_config_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let config = load_config(Some(&path), false).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_lenient_mode_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = load_config(Some(&path), true).unwrap();
        assert_eq!(config.server.port, 5000);
    }
}
