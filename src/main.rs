//! Duelbench - LLM move resolution for two-player game benchmarks
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use settings::LogFormat;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod settings;
mod turn;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let config = settings::load_config()?;
    init_tracing(config.logging.format);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.model.id,
        "Duelbench starting"
    );

    cli::run(cli, config).await
}

/// Logs go to stderr; stdout carries command output
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "duelbench=info,duelbench_llm=info,duelbench_core=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
