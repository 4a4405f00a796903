use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scalelib::{generate, GeneratorConfig, Mode};

/// Render piano scale fingering diagrams and an index page.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory (overrides the config file)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Octaves drawn on each keyboard
    #[arg(long)]
    octaves: Option<u32>,

    /// Render only these modes (repeatable), e.g. `major` or `harmonic-minor`
    #[arg(short, long = "mode", value_name = "MODE")]
    modes: Vec<Mode>,

    /// Write the scale's notes under each keyboard
    #[arg(long)]
    caption: bool,

    /// Skip the JSON manifest
    #[arg(long)]
    no_manifest: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

/// `--verbose` wins over `RUST_LOG`, which wins over the `info` default.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(log_filter(cli.verbose))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match cli.config {
        Some(ref path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(octaves) = cli.octaves {
        config.octaves = octaves;
    }
    if !cli.modes.is_empty() {
        config.modes = cli.modes;
    }
    if cli.caption {
        config.caption = true;
    }
    if cli.no_manifest {
        config.manifest = false;
    }

    let report = generate(&config).context("Failed to generate scale diagrams")?;
    info!(
        "wrote {} diagrams ({} with fingering) and {}",
        report.diagrams,
        report.labeled,
        report.index.display()
    );
    Ok(())
}
