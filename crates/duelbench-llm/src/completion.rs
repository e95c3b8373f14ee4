//! Completion request and response types
//!
//! `ModelRequest` is provider-neutral; the router turns it into a
//! provider-specific `ChatShape`. `GenerationBatch` is the single normalized
//! result shape every provider response is folded into.

use crate::error::{Error, Result};
use crate::token::TokenUsage;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Provider-neutral generation request
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// Logical model identifier
    pub model_id: String,
    /// Sampling temperature (may be overridden by provider policy)
    pub temperature: f32,
    /// Maximum tokens to generate per sample
    pub max_tokens: u32,
    /// Number of samples to return (at least 1)
    pub sample_count: u32,
    /// Per-call timeout handed to the transport
    pub timeout: Duration,
    /// Stop sequence
    pub stop: Option<String>,
    /// Provider-specific options merged over profile defaults
    pub extra_options: serde_json::Map<String, serde_json::Value>,
}

impl ModelRequest {
    /// Create a request for `model_id` with defaults
    #[must_use]
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            temperature: 0.2,
            max_tokens: 1024,
            sample_count: 1,
            timeout: DEFAULT_TIMEOUT,
            stop: None,
            extra_options: serde_json::Map::new(),
        }
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the number of samples
    #[must_use]
    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Set the per-call timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a stop sequence
    #[must_use]
    pub fn with_stop(mut self, stop: Option<String>) -> Self {
        self.stop = stop;
        self
    }

    /// Set one extra option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra_options.insert(key.into(), value);
        self
    }

    /// Replace all extra options
    #[must_use]
    pub fn with_options(mut self, options: serde_json::Map<String, serde_json::Value>) -> Self {
        self.extra_options = options;
        self
    }

    /// Check invariants before dispatch
    ///
    /// # Errors
    /// Returns `InvalidRequest` for an empty model id or `sample_count == 0`
    pub fn validate(&self) -> Result<()> {
        if self.model_id.trim().is_empty() {
            return Err(Error::InvalidRequest("model id is empty".to_string()));
        }
        if self.sample_count == 0 {
            return Err(Error::InvalidRequest(
                "sample_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Normalized result of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationBatch {
    /// Generated texts, one per requested sample, in order
    pub texts: Vec<String>,
    /// Reported-or-estimated usage across every call in the batch
    pub usage: TokenUsage,
}

impl GenerationBatch {
    /// Prompt tokens
    #[must_use]
    pub fn prompt_tokens(&self) -> u32 {
        self.usage.prompt_tokens
    }

    /// Completion tokens
    #[must_use]
    pub fn completion_tokens(&self) -> u32 {
        self.usage.completion_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_request_builder() {
        let request = ModelRequest::new("gpt-4o")
            .with_temperature(0.7)
            .with_max_tokens(256)
            .with_sample_count(3)
            .with_timeout(Duration::from_secs(10))
            .with_option("reasoning_effort", json!("high"));

        assert_eq!(request.model_id, "gpt-4o");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.sample_count, 3);
        assert_eq!(request.timeout, Duration::from_secs(10));
        assert_eq!(request.extra_options["reasoning_effort"], json!("high"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_samples_rejected() {
        let err = ModelRequest::new("gpt-4o")
            .with_sample_count(0)
            .validate()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_model_rejected() {
        assert!(ModelRequest::new("  ").validate().is_err());
    }
}
