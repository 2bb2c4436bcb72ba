//! CLI command implementations.

pub mod config;
pub mod history;
pub mod presets;
pub mod send;
