//! Duelbench LLM - Multi-provider dispatch
//!
//! This crate turns a logical model identifier into completions:
//! - Router: ordered provider profiles and per-provider request shaping
//! - Providers: OpenAI (async-openai) and OpenAI-compatible HTTP backends
//!   (NVIDIA, Anyscale, DeepInfra)
//! - Sampling: native or manual multi-sampling with usage reconciliation
//! - Token: heuristic token estimation for providers that omit usage

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod message;
pub mod providers;
pub mod router;
pub mod sampling;
pub mod token;
pub mod util;

pub use completion::{GenerationBatch, ModelRequest};
pub use error::{Error, Result};
pub use message::{Message, MessageRole, RawMessage};
pub use providers::{ChatBackend, ChatShape, ProviderFamily, ProviderOutput, TokenLimit};
pub use router::{
    profile_for, MockBackend, ProfileKind, ProviderCredentials, ProviderProfile, ProviderRouter,
    Route, RouterConfig, PROFILES,
};
pub use sampling::SamplingAdapter;
pub use token::{estimate_tokens, TokenUsage};
