//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use grundton_config::{TrackerConfig, find_config};
use grundton_tracker::{StringCatalog, TrackerSettings};
use std::path::Path;

/// Load the configuration named on the command line, else the user file,
/// else built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<TrackerConfig> {
    match find_config(explicit) {
        Some(path) => {
            let config = TrackerConfig::load(&path)
                .with_context(|| format!("loading configuration {}", path.display()))?;
            tracing::info!(path = %path.display(), "configuration loaded");
            Ok(config)
        }
        None => {
            tracing::debug!("no configuration file, using defaults");
            Ok(TrackerConfig::default())
        }
    }
}

/// Validated settings and catalog from [`load_config`].
pub fn load_setup(explicit: Option<&Path>) -> anyhow::Result<(TrackerSettings, StringCatalog)> {
    let config = load_config(explicit)?;
    let settings = config.settings().context("invalid configuration")?;
    let catalog = config.catalog().context("invalid string catalog")?;
    Ok((settings, catalog))
}
