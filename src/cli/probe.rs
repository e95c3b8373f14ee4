//! `duelbench probe`

use crate::settings::AppConfig;
use anyhow::{Context, Result};
use clap::Args;
use duelbench_llm::{RawMessage, SamplingAdapter};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Model identifier (defaults to the configured model)
    #[arg(short, long)]
    pub model: Option<String>,
    /// Number of generations
    #[arg(short = 'n', long)]
    pub samples: Option<u32>,
    /// JSON file with `[{"role": ..., "content": ...}]`
    #[arg(long)]
    pub messages: Option<PathBuf>,
    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,
    /// Max tokens per generation
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

fn default_conversation() -> Vec<RawMessage> {
    vec![
        RawMessage::new("system", "You are a helpful assistant."),
        RawMessage::new("user", "What is 3+5?"),
    ]
}

fn load_conversation(path: Option<&PathBuf>) -> Result<Vec<RawMessage>> {
    let Some(path) = path else {
        return Ok(default_conversation());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub async fn run(args: ProbeArgs, config: &AppConfig) -> Result<()> {
    let messages = load_conversation(args.messages.as_ref())?;

    let mut request = config
        .model
        .request(args.model.as_deref(), args.samples);
    if let Some(temperature) = args.temperature {
        request = request.with_temperature(temperature);
    }
    if let Some(max_tokens) = args.max_tokens {
        request = request.with_max_tokens(max_tokens);
    }

    let adapter = SamplingAdapter::new(super::build_router(config)?);
    let batch = adapter
        .sample_raw(&messages, &request)
        .await
        .with_context(|| format!("Generation failed for {}", request.model_id))?;

    println!("Model: {}", request.model_id);
    for (index, text) in batch.texts.iter().enumerate() {
        println!("Generation {}: {}", index + 1, text);
    }
    println!("Prompt tokens: {}", batch.prompt_tokens());
    println!("Completion tokens: {}", batch.completion_tokens());
    println!("Total tokens: {}", batch.usage.total());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_conversation() {
        let messages = load_conversation(None).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].content, "What is 3+5?");
    }
}
