//! `duelbench resolve`

use crate::settings::AppConfig;
use crate::turn::TurnFile;
use anyhow::{Context, Result};
use clap::Args;
use duelbench_core::{MoveResolver, StepRecord};
use duelbench_llm::SamplingAdapter;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Turn file (JSON)
    #[arg(short, long)]
    pub turn: PathBuf,
    /// Model identifier (defaults to the configured model)
    #[arg(short, long)]
    pub model: Option<String>,
    /// Generations for the primary query
    #[arg(short = 'n', long)]
    pub samples: Option<u32>,
}

pub async fn run(args: ResolveArgs, config: &AppConfig) -> Result<()> {
    let turn = TurnFile::load(&args.turn)?;
    let request = config
        .model
        .request(args.model.as_deref(), args.samples);
    let query = turn
        .query(request.sample_count)
        .context("Invalid turn file")?;

    let model_name = request.model_id.clone();
    let resolver = MoveResolver::new(
        SamplingAdapter::new(super::build_router(config)?),
        request,
    );
    let resolved = resolver
        .resolve(&query)
        .await
        .with_context(|| format!("Move resolution failed for {model_name}"))?;

    let step = StepRecord::from_resolved(&turn.agent, &model_name, &resolved);

    println!("Move: {}", resolved.move_text);
    println!("Provenance: {}", resolved.provenance);
    println!("Queries: {}", resolved.query_count());
    println!("{}", step.to_json_line()?);
    Ok(())
}
