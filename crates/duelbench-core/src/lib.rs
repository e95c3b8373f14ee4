//! Duelbench Core - Move resolution
//!
//! This crate turns one game turn into exactly one move:
//! - Prompt: the prompt-template seam and observation type
//! - Query: per-turn conversation and parsing pattern
//! - Resolver: query, parse, retry once, fall back to a legal move
//! - Record: per-step usage records in the match-history schema

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod prompt;
pub mod query;
pub mod record;
pub mod resolver;

pub use error::{Error, Result};
pub use prompt::{Observation, PromptTemplate, StepInstruction};
pub use query::{MoveQuery, RETRY_REMINDER};
pub use record::{QueryRecord, StepRecord};
pub use resolver::{MoveResolver, Provenance, ResolvedMove};
