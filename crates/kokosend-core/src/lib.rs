//! # kokosend-core
//!
//! Core types, configuration, and utilities for KokoSend.
//!
//! This crate provides shared functionality used across the KokoSend crates:
//!
//! - **Configuration**: Loading, validation, presets and environment overrides
//! - **Types**: Destinations, credentials and history entries
//! - **History**: The file-backed log of past sends

pub mod config;
pub mod env;
pub mod error;
pub mod history;
pub mod paths;
pub mod secret;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, HistoryError};
pub use history::HistoryStore;
pub use secret::SecretString;
pub use types::*;
