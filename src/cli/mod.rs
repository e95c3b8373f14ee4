//! CLI module for Duelbench
//!
//! Provides commands:
//! - `probe`: send a conversation to a model and print generations and usage
//! - `resolve`: run move resolution on a turn file
//! - `route`: show how a model identifier is dispatched, without network calls

use crate::settings::AppConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use duelbench_llm::{ProviderCredentials, ProviderRouter, RouterConfig};
use std::sync::Arc;

pub mod probe;
pub mod resolve;
pub mod route;

/// Duelbench CLI
#[derive(Parser, Debug)]
#[command(name = "duelbench")]
#[command(about = "LLM move resolution and multi-provider dispatch for game benchmarks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a conversation and print generations with token usage
    Probe(probe::ProbeArgs),
    /// Resolve one move from a turn file
    Resolve(resolve::ResolveArgs),
    /// Print the routing decision for a model
    Route(route::RouteArgs),
}

/// Run the CLI command
pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Some(Commands::Probe(args)) => probe::run(args, &config).await,
        Some(Commands::Resolve(args)) => resolve::run(args, &config).await,
        Some(Commands::Route(args)) => route::run(&args, &config),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Router over every provider with a credential in the environment
pub(crate) fn build_router(config: &AppConfig) -> Result<Arc<ProviderRouter>> {
    let router_config = RouterConfig::new(ProviderCredentials::from_env())
        .with_endpoints(config.endpoints.clone());
    let router =
        ProviderRouter::from_config(&router_config).context("Failed to initialize providers")?;
    Ok(Arc::new(router))
}
