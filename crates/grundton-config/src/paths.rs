//! Where configuration files live.
//!
//! - Linux: `~/.config/grundton/grundton.toml`
//! - macOS: `~/Library/Application Support/grundton/grundton.toml`
//! - Windows: `%APPDATA%\grundton\grundton.toml`

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "grundton";

/// File name of the user configuration.
pub const CONFIG_FILE_NAME: &str = "grundton.toml";

/// The user configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE_NAME)
}

/// The configuration file to use: `explicit` if given, else the user file if
/// it exists. `None` means run on built-in defaults.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let path = default_config_path();
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_with_app_and_file() {
        let path = default_config_path();
        assert!(path.ends_with(Path::new(APP_NAME).join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn explicit_path_wins_even_if_missing() {
        let explicit = Path::new("/nonexistent/custom.toml");
        assert_eq!(find_config(Some(explicit)), Some(explicit.to_path_buf()));
    }
}
