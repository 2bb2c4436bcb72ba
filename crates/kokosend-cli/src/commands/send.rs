//! The `send` command.

use crate::{render, Context};
use clap::Args;
use kokosend_channels::{
    Aggregate, Attachment, Dispatcher, HttpAdapterFactory, Message, NullRecorder,
    OutcomeRecorder, RichEmbed, SendResult,
};
use kokosend_core::{Destination, HistoryStore, Target};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Send command arguments.
#[derive(Args)]
pub struct SendArgs {
    /// Message text
    #[arg(short, long)]
    pub message: Option<String>,

    /// Attach a file (repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Embed title
    #[arg(long)]
    pub embed_title: Option<String>,

    /// Embed description
    #[arg(long)]
    pub embed_description: Option<String>,

    /// Embed accent colour as hex (e.g. #5865f2)
    #[arg(long, value_parser = parse_color)]
    pub embed_color: Option<u32>,

    /// Send only to these destinations
    #[arg(long, value_name = "DEST", conflicts_with = "skip")]
    pub only: Vec<Destination>,

    /// Do not send to these destinations
    #[arg(long, value_name = "DEST")]
    pub skip: Vec<Destination>,

    /// Use the credentials of a preset for this send
    #[arg(long)]
    pub preset: Option<String>,

    /// Do not offer to retry failed destinations
    #[arg(long)]
    pub no_retry: bool,
}

/// Parse a `#rrggbb`, `0xrrggbb` or `rrggbb` colour.
pub fn parse_color(value: &str) -> Result<u32, String> {
    let hex = value
        .trim()
        .trim_start_matches('#')
        .trim_start_matches("0x");
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("expected six hex digits, got '{}'", value));
    }
    u32::from_str_radix(hex, 16).map_err(|e| format!("invalid colour '{}': {}", value, e))
}

/// Apply `--only` / `--skip` to the configured targets.
pub fn select_targets(
    targets: Vec<Target>,
    only: &[Destination],
    skip: &[Destination],
) -> Vec<Target> {
    targets
        .into_iter()
        .map(|mut target| {
            let destination = target.destination();
            if !only.is_empty() {
                target.enabled = only.contains(&destination);
            }
            if skip.contains(&destination) {
                target.enabled = false;
            }
            target
        })
        .collect()
}

impl SendArgs {
    fn embed(&self) -> Option<RichEmbed> {
        if self.embed_title.is_none() && self.embed_description.is_none() {
            return None;
        }
        Some(RichEmbed::new(
            self.embed_title.clone().unwrap_or_default(),
            self.embed_description.clone().unwrap_or_default(),
            self.embed_color.unwrap_or(0),
        ))
    }
}

/// Run the send command.
pub async fn run(ctx: &Context, args: SendArgs) -> anyhow::Result<()> {
    let mut config = ctx.load_config()?;
    if let Some(preset) = &args.preset {
        config.apply_preset(preset)?;
    }

    let targets = select_targets(config.destinations.targets(), &args.only, &args.skip);
    if !targets.iter().any(|t| t.enabled) {
        anyhow::bail!("No destination enabled. Check your config or --only/--skip.");
    }

    let mut attachments = Vec::with_capacity(args.files.len());
    for path in &args.files {
        attachments.push(Attachment::from_path(path).await?);
    }

    let message = Message {
        text: args.message.clone().unwrap_or_default(),
        attachments,
        embed: args.embed(),
    };
    if !message.has_content() {
        anyhow::bail!("Nothing to send. Provide --message, --file or an embed.");
    }

    let recorder: Arc<dyn OutcomeRecorder> = if config.history.enabled {
        Arc::new(HistoryStore::from_config(&config)?)
    } else {
        debug!("History disabled");
        Arc::new(NullRecorder)
    };
    let factory = Arc::new(HttpAdapterFactory::from_config(
        reqwest::Client::new(),
        &config.destinations,
    ));
    let dispatcher = Dispatcher::new(factory, recorder);

    let mut result = dispatcher.send(message.clone(), targets).await;
    render::render_result(&result);

    let interactive = console::Term::stderr().is_term();
    if !args.no_retry && interactive {
        result = offer_retries(&dispatcher, &message, result).await?;
    }

    match result.aggregate {
        Some(Aggregate::FullFailure) => anyhow::bail!("Message was not delivered"),
        _ => Ok(()),
    }
}

/// Keep offering retries of failed destinations until the user declines.
async fn offer_retries(
    dispatcher: &Dispatcher,
    message: &Message,
    mut result: SendResult,
) -> anyhow::Result<SendResult> {
    loop {
        let failed = result.failed();
        if failed.is_empty() {
            return Ok(result);
        }

        let mut retried = false;
        for destination in failed {
            if !render::confirm(&format!("Retry {}?", destination.label())) {
                continue;
            }
            result = dispatcher
                .retry(destination, message.clone(), message.embed.clone())
                .await?;
            render::render_result(&result);
            retried = true;
        }

        if !retried {
            return Ok(result);
        }
    }
}
