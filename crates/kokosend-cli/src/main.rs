//! KokoSend CLI entry point.

use clap::Parser;
use kokosend_cli::{log_directive, run, Cli, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    let ctx = Context::new(cli.config.clone())?;

    // Initialize logging
    let level = ctx
        .load_config()
        .map(|c| c.logging.level)
        .unwrap_or_default();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_directive(cli.verbose, level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Run the command
    run(cli, ctx).await
}
