//! OpenAI - async-openai backend
//!
//! The only backend with native multi-sampling: `ChatShape::n` maps to the
//! request's `n` and every returned choice becomes one text.

use super::{ChatBackend, ChatShape, ProviderFamily, ProviderOutput, TokenLimit};
use crate::error::{Error, Result};
use crate::message::{Message, MessageRole};
use crate::util::{mask_api_key, sanitize_api_error};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest, StopConfiguration,
    },
    Client,
};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Configuration for the OpenAI backend
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key for authentication
    pub api_key: String,
    /// Optional custom base URL (for proxies)
    pub base_url: Option<String>,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    /// Sets a custom base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

/// OpenAI chat completions backend
pub struct OpenAiBackend {
    config: OpenAiConfig,
}

impl OpenAiBackend {
    /// Creates a new backend with the given configuration
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self { config }
    }

    /// Client bound to one call's timeout.
    ///
    /// The default async-openai client has no timeout and retries rate limits
    /// with backoff; neither is wanted here, so the transport gets the call
    /// timeout and backoff gives up after the first failure.
    fn client(&self, timeout: Duration) -> Result<Client<OpenAIConfig>> {
        let mut openai_config = OpenAIConfig::new().with_api_key(&self.config.api_key);
        if let Some(base_url) = &self.config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network {
                provider: ProviderFamily::OpenAi.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        Ok(Client::build(http_client, openai_config, backoff))
    }

    fn convert_message(msg: &Message) -> ChatCompletionRequestMessage {
        match msg.role {
            MessageRole::System => ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                name: None,
            }
            .into(),
            MessageRole::User => ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
                name: None,
            }
            .into(),
            MessageRole::Assistant =>
            {
                #[allow(deprecated)]
                ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        msg.content.clone(),
                    )),
                    name: None,
                    tool_calls: None,
                    function_call: None,
                    refusal: None,
                    audio: None,
                }
                .into()
            }
        }
    }

    /// Build the typed request for one call
    ///
    /// # Errors
    /// Returns `InvalidRequest` when `n` exceeds what the API accepts
    #[allow(deprecated)]
    pub fn build_request(
        messages: &[Message],
        shape: &ChatShape,
    ) -> Result<CreateChatCompletionRequest> {
        let n = shape
            .n
            .map(u8::try_from)
            .transpose()
            .map_err(|_| Error::InvalidRequest(format!("too many samples: {:?}", shape.n)))?;

        let mut request = CreateChatCompletionRequest {
            model: shape.model.clone(),
            messages: messages.iter().map(Self::convert_message).collect(),
            temperature: Some(shape.temperature),
            top_p: shape.top_p,
            n,
            stop: shape
                .stop
                .clone()
                .map(|s| StopConfiguration::StringArray(vec![s])),
            ..Default::default()
        };

        match shape.token_limit {
            TokenLimit::MaxTokens(limit) => request.max_tokens = Some(limit),
            TokenLimit::MaxCompletionTokens(limit) => request.max_completion_tokens = Some(limit),
        }

        if !shape.options.is_empty() {
            debug!(
                options = ?shape.options.keys().collect::<Vec<_>>(),
                "OpenAI backend ignores extra options"
            );
        }

        Ok(request)
    }
}

#[async_trait::async_trait]
impl ChatBackend for OpenAiBackend {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::OpenAi
    }

    #[instrument(skip(self, messages, shape), fields(model = %shape.model))]
    async fn generate(&self, messages: &[Message], shape: &ChatShape) -> Result<ProviderOutput> {
        let request = Self::build_request(messages, shape)?;
        let client = self.client(shape.timeout)?;

        debug!(n = ?shape.n, "Sending request to OpenAI");

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| map_openai_error(e, shape.timeout))?;

        let mut metadata = json!({ "model": response.model });
        if let Some(usage) = &response.usage {
            metadata["usage"] = json!({
                "prompt_tokens": usage.prompt_tokens,
                "completion_tokens": usage.completion_tokens,
                "total_tokens": usage.total_tokens,
            });
        }

        let texts = response
            .choices
            .into_iter()
            .map(|choice| choice.message.content.unwrap_or_default())
            .collect();

        Ok(ProviderOutput {
            texts,
            metadata: Some(metadata),
        })
    }
}

/// Same error classes as the compatible backends: transport failures are
/// `Timeout`/`Network`, everything the API rejected is `Api`
fn map_openai_error(error: OpenAIError, timeout: Duration) -> Error {
    let provider = ProviderFamily::OpenAi.to_string();
    match error {
        OpenAIError::Reqwest(e) if e.is_timeout() => Error::Timeout {
            provider,
            millis: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        },
        OpenAIError::Reqwest(e) => Error::Network {
            provider,
            message: sanitize_api_error(&e.to_string()),
        },
        other => Error::Api {
            provider,
            status: 0,
            message: sanitize_api_error(&other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(token_limit: TokenLimit, n: Option<u32>) -> ChatShape {
        ChatShape {
            model: "gpt-4o".to_string(),
            temperature: 0.3,
            top_p: None,
            token_limit,
            n,
            stop: None,
            timeout: Duration::from_secs(5),
            options: serde_json::Map::new(),
        }
    }

    #[test]
    #[allow(deprecated)]
    fn test_request_uses_max_tokens() {
        let request = OpenAiBackend::build_request(
            &[Message::user("hi")],
            &shape(TokenLimit::MaxTokens(50), Some(3)),
        )
        .unwrap();
        assert_eq!(request.max_tokens, Some(50));
        assert_eq!(request.max_completion_tokens, None);
        assert_eq!(request.n, Some(3));
        assert_eq!(request.temperature, Some(0.3));
    }

    #[test]
    #[allow(deprecated)]
    fn test_request_uses_max_completion_tokens() {
        let request = OpenAiBackend::build_request(
            &[Message::system("rules"), Message::user("hi")],
            &shape(TokenLimit::MaxCompletionTokens(80), None),
        )
        .unwrap();
        assert_eq!(request.max_tokens, None);
        assert_eq!(request.max_completion_tokens, Some(80));
        assert_eq!(request.n, None);
        assert_eq!(request.messages.len(), 2);
    }

    #[test]
    fn test_too_many_samples_rejected() {
        let err = OpenAiBackend::build_request(
            &[Message::user("hi")],
            &shape(TokenLimit::MaxTokens(50), Some(1000)),
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_config_debug_masks_key() {
        let config = OpenAiConfig::new("sk-1234567890abcdefghijklmnop");
        let debug = format!("{config:?}");
        assert!(!debug.contains("567890abcdefghijkl"));
    }

    #[test]
    fn test_api_rejection_maps_to_api_error() {
        let api_error: async_openai::error::ApiError = serde_json::from_value(json!({
            "message": "Invalid model",
            "type": "invalid_request_error",
            "param": null,
            "code": null
        }))
        .unwrap();
        let error = OpenAIError::ApiError(api_error);
        let mapped = map_openai_error(error, Duration::from_secs(5));
        assert!(matches!(
            mapped,
            Error::Api { ref provider, status: 0, .. } if provider == "openai"
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_network_error() {
        let transport = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();
        assert!(!transport.is_timeout());

        let mapped = map_openai_error(OpenAIError::Reqwest(transport), Duration::from_secs(5));
        assert!(matches!(
            mapped,
            Error::Network { ref provider, .. } if provider == "openai"
        ));
        assert!(!mapped.is_configuration());
    }
}
