use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use irpef_data::ConfigLoader;

/// Print the effective IRPEF configuration as TOML.
///
/// Without arguments the reference configuration is printed, which makes a
/// convenient starting point for a custom configuration file.
///
/// The bracket CSV file should have the following columns:
/// - upper_bound: upper limit of the bracket (empty for the last bracket)
/// - rate: marginal rate as a fraction (e.g., 0.23)
#[derive(Parser, Debug)]
#[command(name = "irpef-config")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration to start from
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV bracket table replacing the configured brackets
    #[arg(short, long)]
    brackets: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigLoader::resolve(args.config.as_deref(), args.brackets.as_deref())
        .context("Failed to load configuration")?;

    let rendered = ConfigLoader::to_toml_string(&config).context("Failed to render configuration")?;
    print!("{rendered}");

    Ok(())
}
