//! The `medscan analyze` command: run the pipeline on a local file.

use clap::Args;
use medscan_core::config::expand_path;
use medscan_core::{Config, MedicalImageAnalyzer};
use std::path::PathBuf;

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file to analyze
    pub file: PathBuf,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, config: Config) -> anyhow::Result<()> {
    let path = expand_path(&args.file);
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let analyzer = MedicalImageAnalyzer::from_config(&config)?;
    let bytes = tokio::fs::read(&path).await?;
    tracing::info!("Analyzing {} ({} bytes)", path.display(), bytes.len());

    let result = analyzer.analyze_bytes(bytes).await?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");

    Ok(())
}
