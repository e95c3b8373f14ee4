//! Turn files
//!
//! A turn file is one already-rendered game turn as JSON: prompts, the
//! step instruction with its move pattern, and the observation with legal
//! moves. It stands in for a game environment's prompt templates.

use anyhow::{Context, Result};
use duelbench_core::{MoveQuery, Observation, PromptTemplate, StepInstruction};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One rendered turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnFile {
    #[serde(default = "default_agent")]
    pub agent: String,
    pub system_prompt: String,
    pub observation_prompt: String,
    pub step: StepInstruction,
    pub observation: Observation,
}

fn default_agent() -> String {
    "prompt_agent".to_string()
}

impl TurnFile {
    /// Read and parse a turn file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read turn file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse turn file {}", path.display()))
    }

    /// Move query for this turn
    pub fn query(&self, num_samples: u32) -> duelbench_core::Result<MoveQuery> {
        MoveQuery::assemble(self, self.observation.clone(), num_samples)
    }
}

impl PromptTemplate for TurnFile {
    fn system_prompt(&self, _env_name: &str) -> String {
        self.system_prompt.clone()
    }

    fn observation_prompt(&self, _observation: &Observation) -> String {
        self.observation_prompt.clone()
    }

    fn step_instruction(&self, _observation: &Observation) -> StepInstruction {
        self.step.clone()
    }
}
