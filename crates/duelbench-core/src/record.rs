//! Match-history records
//!
//! Steps are written as JSON Lines under `matches[].steps[]`. A step's
//! `token_size` is always the sum of its queries' `token_size`.

use crate::resolver::{Provenance, ResolvedMove};
use duelbench_llm::TokenUsage;
use serde::{Deserialize, Serialize};

/// Usage of one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Prompt plus completion
    pub token_size: u32,
}

impl From<TokenUsage> for QueryRecord {
    fn from(usage: TokenUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            token_size: usage.total(),
        }
    }
}

/// One player's turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Agent name
    pub agent: String,
    /// Model identifier
    pub model_name: String,
    /// Sum of the queries' token sizes
    pub token_size: u32,
    /// Queries in issuance order
    pub queries: Vec<QueryRecord>,
    /// Move played
    #[serde(rename = "move")]
    pub move_text: String,
    /// How the move was obtained
    pub provenance: Provenance,
}

impl StepRecord {
    /// Record for a resolved turn
    #[must_use]
    pub fn from_resolved(
        agent: impl Into<String>,
        model_name: impl Into<String>,
        resolved: &ResolvedMove,
    ) -> Self {
        let queries: Vec<QueryRecord> = resolved
            .queries_issued
            .iter()
            .copied()
            .map(QueryRecord::from)
            .collect();
        let token_size = queries
            .iter()
            .fold(0u32, |sum, q| sum.saturating_add(q.token_size));

        Self {
            agent: agent.into(),
            model_name: model_name.into(),
            token_size,
            queries,
            move_text: resolved.move_text.clone(),
            provenance: resolved.provenance,
        }
    }

    /// Summed prompt and completion tokens
    #[must_use]
    pub fn usage(&self) -> TokenUsage {
        self.queries
            .iter()
            .map(|q| TokenUsage::new(q.prompt_tokens, q.completion_tokens))
            .sum()
    }

    /// One JSON line, no trailing newline
    ///
    /// # Errors
    /// Serialization failure
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
