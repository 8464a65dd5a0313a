//! Configuration file support for the grundton string tracker.
//!
//! A [`TrackerConfig`] is the TOML form of
//! [`TrackerSettings`](grundton_tracker::TrackerSettings) plus an optional
//! string table. Every section and key may be omitted.
//!
//! # Example
//!
//! ```rust
//! use grundton_config::TrackerConfig;
//!
//! let config = TrackerConfig::from_toml(r#"
//! [audio]
//! block_size = 96
//!
//! [selection]
//! switch_policy = "reset"
//! "#).unwrap();
//!
//! let settings = config.settings().unwrap();
//! assert_eq!(settings.block_size, 96);
//! assert_eq!(config.catalog().unwrap().len(), 8);
//! ```

mod config;
mod error;

/// Platform-specific configuration paths.
#[cfg(feature = "std")]
pub mod paths;

/// Configuration validation.
pub mod validation;

pub use config::{
    AudioSection, CascadeSection, ConditionerSection, CvSection, DetectorSection, OscillatorSection,
    PeakingEntry, SecondaryOutput, SelectionSection, StringEntry, SwitchPolicyName, TrackerConfig,
};
pub use error::ConfigError;
#[cfg(feature = "std")]
pub use paths::{default_config_path, find_config, user_config_dir};
pub use validation::{ValidationError, validate_config};
