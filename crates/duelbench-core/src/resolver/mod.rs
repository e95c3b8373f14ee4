//! Move resolution pipeline
//!
//! One turn, one move:
//!
//! 1. Primary query with `num_samples` generations, no stop sequence
//! 2. Parse every sample; majority vote picks the move
//! 3. On zero matches, one single-sample retry with a format reminder
//! 4. Still nothing: first legal move, or the empty move
//!
//! Parse failures never surface as errors. Dispatch errors propagate as is.

mod parse;
mod types;

pub use parse::{parse_moves, select_move};
pub use types::{Provenance, ResolvedMove};

use crate::error::Result;
use crate::query::MoveQuery;
use duelbench_llm::{ModelRequest, SamplingAdapter};
use tracing::{info, instrument, warn};

/// Resolves turns against one model configuration
#[derive(Clone)]
pub struct MoveResolver {
    sampler: SamplingAdapter,
    request: ModelRequest,
}

impl MoveResolver {
    /// `request` supplies model, temperature, limits and options; its
    /// sample count and stop sequence are set per query
    #[must_use]
    pub fn new(sampler: SamplingAdapter, request: ModelRequest) -> Self {
        Self { sampler, request }
    }

    /// Request template
    #[must_use]
    pub fn request(&self) -> &ModelRequest {
        &self.request
    }

    /// Resolve one turn
    ///
    /// # Errors
    /// Configuration and transport errors from dispatch. Unparsable answers
    /// are recovered, never raised.
    #[instrument(
        skip_all,
        fields(env = %query.observation.env_name, model = %self.request.model_id)
    )]
    pub async fn resolve(&self, query: &MoveQuery) -> Result<ResolvedMove> {
        let mut queries_issued = Vec::with_capacity(2);

        let primary = self
            .request
            .clone()
            .with_sample_count(query.num_samples)
            .with_stop(None);
        let batch = self.sampler.sample(&query.conversation(), &primary).await?;
        queries_issued.push(batch.usage);

        let moves = parse_moves(&query.pattern, &batch.texts);
        let parsed = if moves.is_empty() {
            warn!(
                samples = batch.texts.len(),
                "No move matched, retrying with format reminder"
            );
            let retry_request = primary.with_sample_count(1);
            let retry = self
                .sampler
                .sample(&query.retry_conversation(), &retry_request)
                .await?;
            queries_issued.push(retry.usage);

            let retry_moves = parse_moves(&query.pattern, &retry.texts);
            select_move(&retry_moves).map(|m| (m.to_string(), Provenance::ParsedRetry))
        } else {
            select_move(&moves).map(|m| (m.to_string(), Provenance::ParsedPrimary))
        };

        let (move_text, provenance) = match parsed.filter(|(m, _)| !m.is_empty()) {
            Some(chosen) => chosen,
            None => fallback(query),
        };

        let resolved = ResolvedMove {
            move_text,
            provenance,
            queries_issued,
        };
        info!(
            move_text = %resolved.move_text,
            provenance = %resolved.provenance,
            queries = resolved.query_count(),
            token_size = resolved.token_size(),
            "Move resolved"
        );
        Ok(resolved)
    }
}

fn fallback(query: &MoveQuery) -> (String, Provenance) {
    match query.observation.first_legal_move() {
        Some(legal) => {
            warn!(fallback = legal, "No parsable move, playing first legal move");
            (legal.to_string(), Provenance::FallbackLegal)
        }
        None => {
            warn!("No parsable move and no legal moves, playing empty move");
            (String::new(), Provenance::FallbackEmpty)
        }
    }
}
