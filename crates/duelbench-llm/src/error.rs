//! Error types for duelbench-llm
//!
//! Configuration errors are fatal and never retried. Transport errors carry
//! the provider they came from so callers can attribute failures.

use thiserror::Error;

/// LLM error type
#[derive(Debug, Error)]
pub enum Error {
    /// Message role outside `system`, `user`, `assistant`
    #[error("unknown message role: {0}")]
    UnknownRole(String),

    /// Credential for a provider family is absent
    #[error("missing credential for {provider}: set {env_var}")]
    MissingCredential {
        /// Provider family name
        provider: String,
        /// Environment variable that should hold the key
        env_var: String,
    },

    /// Request fails local validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider returned a non-success status
    #[error("{provider} api error ({status}): {message}")]
    Api {
        /// Provider family name
        provider: String,
        /// HTTP status code (0 when unknown)
        status: u16,
        /// Sanitized error body
        message: String,
    },

    /// Provider response could not be interpreted
    #[error("{provider} invalid response: {message}")]
    InvalidResponse {
        /// Provider family name
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// Network error
    #[error("{provider} network error: {message}")]
    Network {
        /// Provider family name
        provider: String,
        /// Underlying transport error
        message: String,
    },

    /// Timeout
    #[error("{provider} timeout after {millis}ms")]
    Timeout {
        /// Provider family name
        provider: String,
        /// Configured timeout
        millis: u64,
    },
}

impl Error {
    /// Whether this is a configuration error (caller defect, never transient)
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownRole(_) | Self::MissingCredential { .. } | Self::InvalidRequest(_)
        )
    }

    /// Provider the error is attributed to, if any
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::MissingCredential { provider, .. }
            | Self::Api { provider, .. }
            | Self::InvalidResponse { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. } => Some(provider),
            Self::UnknownRole(_) | Self::InvalidRequest(_) => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(Error::UnknownRole("tool".into()).is_configuration());
        assert!(Error::MissingCredential {
            provider: "nvidia".into(),
            env_var: "NVIDIA_API_KEY".into(),
        }
        .is_configuration());

        let network = Error::Network {
            provider: "openai".into(),
            message: "connection reset".into(),
        };
        assert!(!network.is_configuration());
        assert_eq!(network.provider(), Some("openai"));
    }

    #[test]
    fn test_display_names_provider() {
        let err = Error::Timeout {
            provider: "deepinfra".into(),
            millis: 30_000,
        };
        assert_eq!(err.to_string(), "deepinfra timeout after 30000ms");
    }
}
