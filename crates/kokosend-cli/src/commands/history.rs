//! History commands.

use crate::{render, Context};
use clap::Args;
use kokosend_core::HistoryStore;

/// History command arguments.
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(clap::Subcommand)]
pub enum HistoryCommand {
    /// List past sends, newest first
    List {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete all history
    Clear,
}

/// Run the history command.
pub async fn run(ctx: &Context, args: HistoryArgs) -> anyhow::Result<()> {
    let config = ctx.load_config()?;
    let store = HistoryStore::from_config(&config)?;

    match args.command {
        HistoryCommand::List { limit } => {
            let entries = store.list();
            if entries.is_empty() {
                println!("No history yet");
                return Ok(());
            }
            let limit = limit.unwrap_or(entries.len());
            for entry in entries.iter().take(limit) {
                println!("{}", render::history_line(entry));
            }
        }

        HistoryCommand::Clear => {
            store.clear()?;
            println!("History cleared");
        }
    }

    Ok(())
}
