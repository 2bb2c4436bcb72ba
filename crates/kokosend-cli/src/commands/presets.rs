//! Credential preset commands.

use crate::Context;
use clap::Args;
use console::style;
use kokosend_core::config::{Preset, EMPTY_PRESET};

/// Presets command arguments.
#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    pub command: PresetsCommand,
}

#[derive(clap::Subcommand)]
pub enum PresetsCommand {
    /// List presets
    List,

    /// Copy a preset's credentials into the configuration
    Apply {
        /// Preset name
        name: String,
    },
}

/// Which credentials a preset fills in, e.g. `webhook, bot`.
pub fn preset_summary(preset: &Preset) -> String {
    let mut parts = Vec::new();
    if !preset.webhook_url.is_blank() {
        parts.push("webhook");
    }
    if !preset.bot_token.is_blank() && !preset.bot_chat_id.trim().is_empty() {
        parts.push("bot");
    }
    if parts.is_empty() {
        "no credentials".to_string()
    } else {
        parts.join(", ")
    }
}

/// Run the presets command.
pub async fn run(ctx: &Context, args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => {
            let config = ctx.load_stored_config()?;
            for preset in config.all_presets() {
                let marker = if preset.name == EMPTY_PRESET {
                    style(" (built-in)").dim().to_string()
                } else {
                    String::new()
                };
                println!(
                    "{}{}  {}",
                    style(&preset.name).bold(),
                    marker,
                    style(preset_summary(&preset)).dim()
                );
            }
        }

        PresetsCommand::Apply { name } => {
            let mut config = ctx.load_stored_config()?;
            config.apply_preset(&name)?;
            config.save(ctx.config_path())?;
            println!("Applied preset {} to {}", name, ctx.config_path().display());
        }
    }

    Ok(())
}
