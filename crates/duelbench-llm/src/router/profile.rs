//! Provider profiles
//!
//! A static, ordered table of routing facts. Selection is a linear scan and
//! the first profile whose predicate matches wins. Order matters: the
//! reserved gpt-oss identifiers also contain "gpt" and must be checked before
//! the generic OpenAI rule, and the DeepInfra profile matches everything.

use crate::completion::ModelRequest;
use crate::providers::{ChatShape, ProviderFamily, TokenLimit};
use serde::Serialize;
use serde_json::{Map, Value};

/// Usage fields probed in provider metadata, in order
pub const USAGE_FIELDS: &[&str] = &["token_usage", "usage"];

/// Community-hosted model served through Anyscale
pub const OPEN_ORCA_MODEL: &str = "Open-Orca/Mistral-7B-OpenOrca";

/// Routing rule identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// `openai/gpt-oss-20b` on NVIDIA
    GptOss20b,
    /// `openai/gpt-oss-120b` on NVIDIA
    GptOss120b,
    /// Any other id containing "gpt", on OpenAI
    OpenAiChat,
    /// Open-Orca Mistral on Anyscale
    OpenOrca,
    /// Everything else, on DeepInfra
    DeepInfra,
}

/// Routing facts for one family of logical model identifiers
#[derive(Debug, Serialize)]
pub struct ProviderProfile {
    /// Which rule this is
    pub kind: ProfileKind,
    /// Backend family serving it
    pub family: ProviderFamily,
    /// Provider returns one sample per call
    pub requires_manual_sampling: bool,
    /// Metadata fields probed for usage, first hit wins
    pub token_field_candidates: &'static [&'static str],
}

/// The routing table, highest priority first
pub static PROFILES: [ProviderProfile; 5] = [
    ProviderProfile {
        kind: ProfileKind::GptOss20b,
        family: ProviderFamily::Nvidia,
        requires_manual_sampling: true,
        token_field_candidates: USAGE_FIELDS,
    },
    ProviderProfile {
        kind: ProfileKind::GptOss120b,
        family: ProviderFamily::Nvidia,
        requires_manual_sampling: true,
        token_field_candidates: USAGE_FIELDS,
    },
    ProviderProfile {
        kind: ProfileKind::OpenAiChat,
        family: ProviderFamily::OpenAi,
        requires_manual_sampling: false,
        token_field_candidates: USAGE_FIELDS,
    },
    ProviderProfile {
        kind: ProfileKind::OpenOrca,
        family: ProviderFamily::Anyscale,
        requires_manual_sampling: true,
        token_field_candidates: USAGE_FIELDS,
    },
    ProviderProfile {
        kind: ProfileKind::DeepInfra,
        family: ProviderFamily::DeepInfra,
        requires_manual_sampling: true,
        token_field_candidates: USAGE_FIELDS,
    },
];

/// First profile matching `model_id`
#[must_use]
pub fn profile_for(model_id: &str) -> &'static ProviderProfile {
    let last = &PROFILES[PROFILES.len() - 1];
    PROFILES
        .iter()
        .find(|profile| profile.matches(model_id))
        .unwrap_or(last)
}

fn is_reserved(model_id: &str, name: &str) -> bool {
    model_id == format!("openai/{name}") || model_id.ends_with(name)
}

/// Models whose API only accepts the default temperature and
/// `max_completion_tokens`
fn is_fixed_temperature_model(model_id: &str) -> bool {
    model_id.starts_with("gpt-5")
}

impl ProviderProfile {
    /// Whether this profile serves `model_id`
    #[must_use]
    pub fn matches(&self, model_id: &str) -> bool {
        match self.kind {
            ProfileKind::GptOss20b => is_reserved(model_id, "gpt-oss-20b"),
            ProfileKind::GptOss120b => is_reserved(model_id, "gpt-oss-120b"),
            ProfileKind::OpenAiChat => model_id.contains("gpt"),
            ProfileKind::OpenOrca => model_id == OPEN_ORCA_MODEL,
            ProfileKind::DeepInfra => true,
        }
    }

    /// Provider can return N samples from one call
    #[must_use]
    pub fn supports_native_sampling(&self) -> bool {
        !self.requires_manual_sampling
    }

    /// Options sent unless the caller overrides them
    #[must_use]
    pub fn default_options(&self) -> Map<String, Value> {
        let mut options = Map::new();
        if self.kind == ProfileKind::GptOss20b {
            options.insert("reasoning_effort".into(), Value::from("low"));
            options.insert("stream_reasoning".into(), Value::Bool(false));
            options.insert("reasoning".into(), Value::Bool(false));
        }
        options
    }

    /// Model name sent on the wire
    #[must_use]
    pub fn resolve_model(&self, model_id: &str) -> String {
        let qualified = |name: &str| {
            if model_id.contains('/') {
                model_id.to_string()
            } else {
                format!("openai/{name}")
            }
        };
        match self.kind {
            ProfileKind::GptOss20b => qualified("gpt-oss-20b"),
            ProfileKind::GptOss120b => qualified("gpt-oss-120b"),
            ProfileKind::OpenAiChat | ProfileKind::OpenOrca | ProfileKind::DeepInfra => {
                model_id.to_string()
            }
        }
    }

    /// Exact call parameters for `request`, one sample per call
    ///
    /// Caller options replace only the default keys they name.
    #[must_use]
    pub fn shape(&self, request: &ModelRequest) -> ChatShape {
        let mut options = self.default_options();
        options.extend(
            request
                .extra_options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let (temperature, token_limit) = match self.kind {
            ProfileKind::OpenAiChat if is_fixed_temperature_model(&request.model_id) => {
                (1.0, TokenLimit::MaxCompletionTokens(request.max_tokens))
            }
            _ => (request.temperature, TokenLimit::MaxTokens(request.max_tokens)),
        };

        let top_p = matches!(self.kind, ProfileKind::GptOss20b | ProfileKind::GptOss120b)
            .then_some(1.0);

        ChatShape {
            model: self.resolve_model(&request.model_id),
            temperature,
            top_p,
            token_limit,
            n: None,
            stop: request.stop.clone(),
            timeout: request.timeout,
            options,
        }
    }
}
