//! Token accounting
//!
//! `TokenUsage` is the normalized per-call usage record. When a provider
//! omits usage metadata the counts come from `estimate_tokens`, a fixed
//! four-characters-per-token heuristic that is provider and language
//! agnostic. Estimates never override provider-reported counts.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

/// Characters per estimated token
const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of `text`
///
/// Empty text is 0 tokens; anything else is at least 1.
#[must_use]
pub fn estimate_tokens(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }
    let tokens = (text.chars().count() / CHARS_PER_TOKEN).max(1);
    u32::try_from(tokens).unwrap_or(u32::MAX)
}

/// Token usage for one call (or an aggregate of calls)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Create a usage record
    #[must_use]
    pub const fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Estimate usage from prompt and completion text
    #[must_use]
    pub fn estimate(prompt_text: &str, completion_text: &str) -> Self {
        Self::new(estimate_tokens(prompt_text), estimate_tokens(completion_text))
    }

    /// Read `prompt_tokens`/`completion_tokens` from provider metadata
    ///
    /// Probes `candidates` in order and uses the first field present. Missing
    /// counts inside that field read as 0. Returns `None` when no candidate
    /// field exists.
    #[must_use]
    pub fn from_metadata(metadata: Option<&serde_json::Value>, candidates: &[&str]) -> Option<Self> {
        let metadata = metadata?;
        let field = candidates.iter().find_map(|name| metadata.get(*name))?;
        let read = |key: &str| {
            field
                .get(key)
                .and_then(serde_json::Value::as_u64)
                .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX))
        };
        Some(Self::new(read("prompt_tokens"), read("completion_tokens")))
    }

    /// Prompt plus completion tokens
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }

    /// Both counts are exactly zero
    ///
    /// Treated as "usage missing". A legitimately free response is
    /// indistinguishable from absent telemetry here.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.prompt_tokens == 0 && self.completion_tokens == 0
    }
}

impl Add for TokenUsage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.prompt_tokens.saturating_add(rhs.prompt_tokens),
            self.completion_tokens.saturating_add(rhs.completion_tokens),
        )
    }
}

impl Sum for TokenUsage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a TokenUsage> for TokenUsage {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
