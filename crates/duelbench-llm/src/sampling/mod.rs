//! Sampling adapter
//!
//! Produces exactly `sample_count` completions and one reconciled usage
//! record, whether or not the routed provider can return several samples
//! from one call.
//!
//! - Native path: one call with `n = sample_count`, usage read from the
//!   response.
//! - Manual path: `sample_count` sequential single-sample calls. Each call's
//!   usage is read from the first candidate metadata field present; when
//!   none is present, or both counts are zero, it is estimated from the
//!   prompt and that call's text.
//!
//! Either way, a batch whose totals are still zero is re-estimated once from
//! the whole conversation and all returned texts.

use crate::completion::{GenerationBatch, ModelRequest};
use crate::error::{Error, Result};
use crate::message::{joined_content, Message, RawMessage};
use crate::providers::ProviderOutput;
use crate::router::{ProviderProfile, ProviderRouter, Route};
use crate::token::TokenUsage;
use std::sync::Arc;
use tracing::{debug, instrument};


/// One single-sample call's reconciled result
#[derive(Debug, Clone)]
struct CallOutcome {
    text: String,
    usage: TokenUsage,
}

/// Executes generations through the router
#[derive(Clone)]
pub struct SamplingAdapter {
    router: Arc<ProviderRouter>,
}

impl SamplingAdapter {
    /// Create an adapter over `router`
    #[must_use]
    pub fn new(router: Arc<ProviderRouter>) -> Self {
        Self { router }
    }

    /// The underlying router
    #[must_use]
    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    /// Convert a raw conversation, then sample
    ///
    /// An unknown role fails before routing or any network call.
    ///
    /// # Errors
    /// Configuration errors and transport errors, unmodified
    pub async fn sample_raw(
        &self,
        messages: &[RawMessage],
        request: &ModelRequest,
    ) -> Result<GenerationBatch> {
        let messages = Message::conversation_from_raw(messages)?;
        self.sample(&messages, request).await
    }

    /// Produce `request.sample_count` generations
    ///
    /// # Errors
    /// Configuration errors (invalid request, missing credential) and
    /// transport/provider errors, unmodified. Nothing is retried.
    #[instrument(
        skip(self, messages, request),
        fields(model = %request.model_id, samples = request.sample_count)
    )]
    pub async fn sample(
        &self,
        messages: &[Message],
        request: &ModelRequest,
    ) -> Result<GenerationBatch> {
        request.validate()?;
        let route = self.router.route(&request.model_id)?;
        let prompt_text = joined_content(messages);

        let batch = if route.profile.supports_native_sampling() && request.sample_count > 1 {
            self.sample_native(&route, messages, request).await?
        } else {
            self.sample_manual(&route, messages, request, &prompt_text).await?
        };

        let batch = if batch.usage.is_zero() {
            let completion_text: String = batch.texts.concat();
            debug!("Batch usage still zero, estimating from full conversation");
            GenerationBatch {
                usage: TokenUsage::estimate(&prompt_text, &completion_text),
                ..batch
            }
        } else {
            batch
        };

        debug!(
            texts = batch.texts.len(),
            prompt_tokens = batch.usage.prompt_tokens,
            completion_tokens = batch.usage.completion_tokens,
            "Sampling complete"
        );
        Ok(batch)
    }

    async fn sample_native(
        &self,
        route: &Route,
        messages: &[Message],
        request: &ModelRequest,
    ) -> Result<GenerationBatch> {
        let shape = route.shape(request).with_samples(request.sample_count);
        let output = route.backend.generate(messages, &shape).await?;

        let expected = request.sample_count as usize;
        if output.texts.len() != expected {
            return Err(Error::InvalidResponse {
                provider: route.profile.family.to_string(),
                message: format!("expected {expected} choices, got {}", output.texts.len()),
            });
        }

        let usage = reported_usage(route.profile, &output).unwrap_or_default();
        Ok(GenerationBatch {
            texts: output.texts,
            usage,
        })
    }

    async fn sample_manual(
        &self,
        route: &Route,
        messages: &[Message],
        request: &ModelRequest,
        prompt_text: &str,
    ) -> Result<GenerationBatch> {
        let shape = route.shape(request);
        let mut outcomes = Vec::with_capacity(request.sample_count as usize);

        for index in 0..request.sample_count {
            let output = route.backend.generate(messages, &shape).await?;
            let usage = reported_usage(route.profile, &output).filter(|u| !u.is_zero());

            let text = output
                .texts
                .into_iter()
                .next()
                .ok_or_else(|| Error::InvalidResponse {
                    provider: route.profile.family.to_string(),
                    message: "no choices in response".to_string(),
                })?;

            let usage = usage.unwrap_or_else(|| {
                debug!(call = index, "Usage missing, estimating");
                TokenUsage::estimate(prompt_text, &text)
            });

            outcomes.push(CallOutcome { text, usage });
        }

        Ok(fold_outcomes(outcomes))
    }
}

/// Usage reported by the provider, if any candidate field is present
fn reported_usage(profile: &ProviderProfile, output: &ProviderOutput) -> Option<TokenUsage> {
    TokenUsage::from_metadata(output.metadata.as_ref(), profile.token_field_candidates)
}

fn fold_outcomes(outcomes: Vec<CallOutcome>) -> GenerationBatch {
    outcomes.into_iter().fold(
        GenerationBatch {
            texts: Vec::new(),
            usage: TokenUsage::default(),
        },
        |mut batch, outcome| {
            batch.texts.push(outcome.text);
            batch.usage = batch.usage + outcome.usage;
            batch
        },
    )
}
