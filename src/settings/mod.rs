//! Application settings
//!
//! Model defaults, endpoint overrides and logging format. Credentials are
//! not part of the settings; they come from the provider environment
//! variables.

mod loader;

pub use loader::load_config;

use duelbench_llm::router::EndpointOverrides;
use duelbench_llm::ModelRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub model: ModelSettings,
    #[serde(default)]
    pub endpoints: EndpointOverrides,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Default model request parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    pub id: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_samples")]
    pub samples: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub options: Map<String, Value>,
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_samples() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            id: "openai/gpt-oss-20b".to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            samples: default_samples(),
            timeout_secs: default_timeout_secs(),
            options: Map::new(),
        }
    }
}

impl ModelSettings {
    /// Request for `model` (or the configured id) with these defaults
    pub fn request(&self, model: Option<&str>, samples: Option<u32>) -> ModelRequest {
        ModelRequest::new(model.unwrap_or(&self.id))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
            .with_sample_count(samples.unwrap_or(self.samples))
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_options(self.options.clone())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
}
