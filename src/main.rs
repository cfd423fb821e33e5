use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use gtgen::{Configuration, DataGenerationPipeline};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    // Expect exactly one positional argument: the configuration file.
    let mut args = std::env::args_os().skip(1);
    let config_path = match (args.next(), args.next()) {
        (Some(path), None) => PathBuf::from(path),
        _ => anyhow::bail!("usage: gtgen <config.toml>"),
    };
    let config = Configuration::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let pipeline = DataGenerationPipeline::new(config)?;
    pipeline.start()?;
    Ok(())
}
