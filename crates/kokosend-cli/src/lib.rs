//! KokoSend command-line interface.

pub mod commands;
pub mod render;

use clap::{Parser, Subcommand};
use kokosend_core::config::{Config, LogLevel};
use kokosend_core::error::ConfigError;
use kokosend_core::paths;
use std::path::{Path, PathBuf};

/// KokoSend - send one message to several chat destinations
#[derive(Parser)]
#[command(name = "kokosend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "KOKOSEND_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Send a message
    Send(commands::send::SendArgs),

    /// Show or clear the send history
    History(commands::history::HistoryArgs),

    /// Manage credential presets
    Presets(commands::presets::PresetsArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    config_path: PathBuf,
}

impl Context {
    /// Resolve the config file location.
    pub fn new(config: Option<PathBuf>) -> anyhow::Result<Self> {
        let config_path = match config {
            Some(path) => paths::expand_tilde(&path.to_string_lossy()),
            None => paths::config_file()?,
        };
        Ok(Self { config_path })
    }

    /// Config file location.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Effective configuration: the file (or defaults) plus environment overrides.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        Config::load_from(Some(&self.config_path))
    }

    /// The file as written, without environment overrides, for editing.
    pub fn load_stored_config(&self) -> Result<Config, ConfigError> {
        match Config::load(&self.config_path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }
}

/// Log filter used when `RUST_LOG` is not set.
pub fn log_directive(verbose: u8, level: LogLevel) -> String {
    let level = match verbose {
        0 => level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    format!("kokosend={}", level)
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli, ctx: Context) -> anyhow::Result<()> {
    match cli.command {
        Commands::Send(args) => commands::send::run(&ctx, args).await,
        Commands::History(args) => commands::history::run(&ctx, args).await,
        Commands::Presets(args) => commands::presets::run(&ctx, args).await,
        Commands::Config(args) => commands::config::run(&ctx, args).await,
        Commands::Version => {
            println!("kokosend {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
