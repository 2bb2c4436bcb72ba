//! Path resolution utilities.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the KokoSend base directory (~/.kokosend).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".kokosend"))
}

/// Get the main config file path (~/.kokosend/kokosend.json5).
pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("kokosend.json5"))
}

/// Get the default history file path (~/.kokosend/history.json).
pub fn history_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("history.json"))
}

/// Expand tilde (~) in a path.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
