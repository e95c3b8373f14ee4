//! OpenAI-compatible HTTP backend
//!
//! NVIDIA, Anyscale and DeepInfra all expose `/chat/completions` with the
//! OpenAI wire format, so one reqwest client serves them. Profile options
//! (e.g. `reasoning_effort`) are sent as top-level body fields.

use super::{ChatBackend, ChatShape, ProviderFamily, ProviderOutput};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::util::{mask_api_key, sanitize_api_error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, instrument};

/// Configuration for an OpenAI-compatible endpoint
#[derive(Clone)]
pub struct CompatConfig {
    /// Family served by this endpoint
    pub family: ProviderFamily,
    /// API key
    pub api_key: String,
    /// Base URL (without `/chat/completions`)
    pub base_url: String,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for CompatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatConfig")
            .field("family", &self.family)
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CompatConfig {
    /// Configuration for `family` at its default base URL
    #[must_use]
    pub fn new(family: ProviderFamily, api_key: impl Into<String>) -> Self {
        Self {
            family,
            api_key: api_key.into(),
            base_url: family.default_base_url().to_string(),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Backend for OpenAI-compatible endpoints
pub struct CompatBackend {
    client: Client,
    config: CompatConfig,
}

impl CompatBackend {
    /// Create a new backend
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: CompatConfig) -> Result<Self> {
        let client = Client::builder().build().map_err(|e| Error::Network {
            provider: config.family.to_string(),
            message: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self { client, config })
    }

    /// Request body for one call
    ///
    /// Options go in first so the core parameters always win.
    #[must_use]
    pub fn build_body(messages: &[Message], shape: &ChatShape) -> Value {
        let mut body = shape.options.clone();

        let messages: Vec<ChatMessage<'_>> = messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role.as_str(),
                content: &m.content,
            })
            .collect();

        body.insert("model".into(), Value::from(shape.model.clone()));
        body.insert("messages".into(), serde_json::json!(messages));
        body.insert("temperature".into(), Value::from(shape.temperature));
        body.insert(
            shape.token_limit.param_name().into(),
            Value::from(shape.token_limit.value()),
        );
        if let Some(top_p) = shape.top_p {
            body.insert("top_p".into(), Value::from(top_p));
        }
        if let Some(n) = shape.n {
            body.insert("n".into(), Value::from(n));
        }
        if let Some(stop) = &shape.stop {
            body.insert("stop".into(), serde_json::json!([stop]));
        }
        body.insert("stream".into(), Value::Bool(false));

        Value::Object(body)
    }

    fn provider(&self) -> String {
        self.config.family.to_string()
    }
}

#[async_trait::async_trait]
impl ChatBackend for CompatBackend {
    fn family(&self) -> ProviderFamily {
        self.config.family
    }

    #[instrument(skip(self, messages, shape), fields(provider = %self.config.family, model = %shape.model))]
    async fn generate(&self, messages: &[Message], shape: &ChatShape) -> Result<ProviderOutput> {
        let body = Self::build_body(messages, shape);

        debug!(n = ?shape.n, "Sending request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .timeout(shape.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout {
                        provider: self.provider(),
                        millis: u64::try_from(shape.timeout.as_millis()).unwrap_or(u64::MAX),
                    }
                } else {
                    Error::Network {
                        provider: self.provider(),
                        message: sanitize_api_error(&e.to_string()),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                provider: self.provider(),
                status: status.as_u16(),
                message: sanitize_api_error(&error_text),
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(|e| Error::InvalidResponse {
                provider: self.provider(),
                message: e.to_string(),
            })?;

        let texts = chat_response
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default())
            .collect();

        Ok(ProviderOutput {
            texts,
            metadata: Some(Value::Object(chat_response.metadata)),
        })
    }
}
