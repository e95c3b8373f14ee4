//! Provider backends
//!
//! Every backend speaks the chat-completions protocol and returns the
//! generated texts plus the raw provider metadata. Usage is not interpreted
//! here; the sampling layer probes the metadata per profile.
//!
//! - `openai`: OpenAI via async-openai (native `n` sampling)
//! - `compat`: OpenAI-compatible HTTP endpoints via reqwest (NVIDIA,
//!   Anyscale, DeepInfra)

/// OpenAI-compatible HTTP backend
pub mod compat;
/// OpenAI backend
pub mod openai;

pub use compat::CompatBackend;
pub use openai::OpenAiBackend;

use crate::error::Result;
use crate::message::Message;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Backend family: one credential and one endpoint per family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    /// NVIDIA-hosted open models (gpt-oss family)
    Nvidia,
    /// OpenAI chat completions
    OpenAi,
    /// Anyscale endpoints
    Anyscale,
    /// DeepInfra OpenAI-compatible gateway
    DeepInfra,
}

impl ProviderFamily {
    /// Every family, in routing order
    pub const ALL: [ProviderFamily; 4] = [
        ProviderFamily::Nvidia,
        ProviderFamily::OpenAi,
        ProviderFamily::Anyscale,
        ProviderFamily::DeepInfra,
    ];

    /// Provider name used in logs and errors
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nvidia => "nvidia",
            Self::OpenAi => "openai",
            Self::Anyscale => "anyscale",
            Self::DeepInfra => "deepinfra",
        }
    }

    /// Environment variable holding the API key
    #[must_use]
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Nvidia => "NVIDIA_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anyscale => "ANYSCALE_API_KEY",
            Self::DeepInfra => "DEEPINFRA_API_KEY",
        }
    }

    /// Default API base URL
    #[must_use]
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Nvidia => "https://integrate.api.nvidia.com/v1",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anyscale => "https://api.endpoints.anyscale.com/v1",
            Self::DeepInfra => "https://api.deepinfra.com/v1/openai",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which parameter carries the generation limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "param", content = "value")]
pub enum TokenLimit {
    /// Standard `max_tokens`
    MaxTokens(u32),
    /// `max_completion_tokens` (models that reject `max_tokens`)
    MaxCompletionTokens(u32),
}

impl TokenLimit {
    /// Wire name of the parameter
    #[must_use]
    pub fn param_name(&self) -> &'static str {
        match self {
            Self::MaxTokens(_) => "max_tokens",
            Self::MaxCompletionTokens(_) => "max_completion_tokens",
        }
    }

    /// Limit value
    #[must_use]
    pub fn value(&self) -> u32 {
        match self {
            Self::MaxTokens(v) | Self::MaxCompletionTokens(v) => *v,
        }
    }
}

/// Exact, provider-specific call parameters for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatShape {
    /// Model name sent on the wire
    pub model: String,
    /// Temperature after provider policy
    pub temperature: f32,
    /// Nucleus sampling, when the provider pins it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Generation limit and its parameter name
    pub token_limit: TokenLimit,
    /// Samples per call; `None` means the provider default of one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    /// Stop sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    /// Per-call timeout
    #[serde(skip)]
    pub timeout: Duration,
    /// Extra body parameters (profile defaults overlaid with caller options)
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl ChatShape {
    /// Copy of this shape requesting `n` samples in one call
    #[must_use]
    pub fn with_samples(mut self, n: u32) -> Self {
        self.n = (n > 1).then_some(n);
        self
    }
}

/// What a backend returns for one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOutput {
    /// Generated texts, one per returned choice
    pub texts: Vec<String>,
    /// Provider metadata (response body minus choices), probed for usage
    pub metadata: Option<serde_json::Value>,
}

impl ProviderOutput {
    /// Output with a single text and no metadata
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            texts: vec![text.into()],
            metadata: None,
        }
    }

    /// Attach metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A chat-completions backend
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Family this backend serves
    fn family(&self) -> ProviderFamily;

    /// Issue one call
    ///
    /// Transport and provider failures are returned as-is; backends never
    /// retry.
    async fn generate(&self, messages: &[Message], shape: &ChatShape) -> Result<ProviderOutput>;
}
