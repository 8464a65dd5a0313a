//! Configuration dump.

use crate::commands::common::load_config;
use anyhow::Context;
use clap::Args;
use grundton_config::default_config_path;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration file to start from (default: user file, else built-in)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Include the full string table
    #[arg(long)]
    with_strings: bool,

    /// Save to this file instead of printing
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Save to the user configuration file
    #[arg(long, conflicts_with = "output")]
    save: bool,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.validate().context("invalid configuration")?;
    if args.with_strings && config.strings.is_empty() {
        let catalog = config.catalog()?;
        config = config.with_catalog(&catalog);
    }

    let target = if args.save { Some(default_config_path()) } else { args.output };
    match target {
        Some(path) => {
            config.save(&path).with_context(|| format!("saving {}", path.display()))?;
            tracing::info!(path = %path.display(), "configuration saved");
            println!("Saved {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
