//! Resolution result types

use duelbench_llm::TokenUsage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a move was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Parsed from the primary query
    ParsedPrimary,
    /// Parsed from the single retry query
    ParsedRetry,
    /// First legal move, delimiters stripped
    FallbackLegal,
    /// No legal moves were available
    FallbackEmpty,
}

impl Provenance {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParsedPrimary => "parsed-primary",
            Self::ParsedRetry => "parsed-retry",
            Self::FallbackLegal => "fallback-legal",
            Self::FallbackEmpty => "fallback-empty",
        }
    }

    /// Whether the move came from a model answer
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::ParsedPrimary | Self::ParsedRetry)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly one per turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMove {
    /// Move to play (may be empty only with `FallbackEmpty`)
    pub move_text: String,
    /// How it was obtained
    pub provenance: Provenance,
    /// Usage of every query issued, in issuance order
    pub queries_issued: Vec<TokenUsage>,
}

impl ResolvedMove {
    /// Summed usage across all queries of the turn
    #[must_use]
    pub fn usage(&self) -> TokenUsage {
        self.queries_issued.iter().sum()
    }

    /// Total tokens across all queries of the turn
    #[must_use]
    pub fn token_size(&self) -> u32 {
        self.usage().total()
    }

    /// Number of queries issued
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries_issued.len()
    }
}
