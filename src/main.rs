use std::path::{Path, PathBuf};

use anyhow::Context;
use log::info;
use nordic_pipeline::{PipelineConfig, PipelinePaths, run_pipeline};

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if !(3..=4).contains(&args.len()) {
        eprintln!("Usage: {} <input-dir> <output-dir> [config.json]", args[0]);
        std::process::exit(1);
    }
    let input_dir = Path::new(&args[1]);
    let output_dir = Path::new(&args[2]);

    let config = match args.get(3) {
        Some(path) => PipelineConfig::from_json_file(&PathBuf::from(path))
            .with_context(|| format!("failed to load config from {path}"))?,
        None => PipelineConfig::default(),
    };

    let paths = PipelinePaths::new(input_dir, output_dir);
    let output = run_pipeline(&paths, &config).context("pipeline run failed")?;

    info!(
        "Pipeline complete: {} customers, {} transactions, {} feature rows written to {}",
        output.customers.len(),
        output.transactions.len(),
        output.features.len(),
        output_dir.display()
    );
    Ok(())
}
