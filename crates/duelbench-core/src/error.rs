//! Error types for duelbench-core

use thiserror::Error;

/// Core error type
///
/// Parse failures are not errors here: the resolver recovers them by
/// retrying once and then falling back to a legal move.
#[derive(Debug, Error)]
pub enum Error {
    /// Dispatch failed (configuration or transport)
    #[error("llm error: {0}")]
    Llm(#[from] duelbench_llm::Error),

    /// The step instruction's move pattern does not compile
    #[error("invalid move pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Pattern as supplied
        pattern: String,
        /// Compilation error
        #[source]
        source: regex::Error,
    },

    /// The turn cannot be queried as given
    #[error("invalid turn: {0}")]
    InvalidTurn(String),
}

impl Error {
    /// Fatal setup problem that retrying cannot fix
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_configuration(),
            Self::InvalidPattern { .. } | Self::InvalidTurn(_) => true,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
