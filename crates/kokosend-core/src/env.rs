//! Environment variable handling.

use std::env;

/// Environment variables KokoSend reads.
pub mod vars {
    /// Path to the config file.
    pub const CONFIG: &str = "KOKOSEND_CONFIG";
    /// Webhook URL override.
    pub const WEBHOOK_URL: &str = "KOKOSEND_WEBHOOK_URL";
    /// Bot token override.
    pub const BOT_TOKEN: &str = "KOKOSEND_BOT_TOKEN";
    /// Bot chat ID override.
    pub const BOT_CHAT_ID: &str = "KOKOSEND_BOT_CHAT_ID";
    /// Disables the history log when truthy.
    pub const NO_HISTORY: &str = "KOKOSEND_NO_HISTORY";
}

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Whether a variable value reads as "on".
pub fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
