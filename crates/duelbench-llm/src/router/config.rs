//! Configuration types for provider routing
//!
//! Credentials are resolved once, at startup, into an explicit value that is
//! handed to the router. Nothing reads the environment during dispatch.

use crate::error::{Error, Result};
use crate::providers::ProviderFamily;
use crate::util::mask_api_key;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// API keys per provider family
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    keys: HashMap<ProviderFamily, String>,
}

// SECURITY: Custom Debug implementation to mask API keys
impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for family in ProviderFamily::ALL {
            if let Some(key) = self.keys.get(&family) {
                map.entry(&family.as_str(), &mask_api_key(key));
            }
        }
        map.finish()
    }
}

impl ProviderCredentials {
    /// Empty credential set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every family's key from the process environment
    ///
    /// Absent or blank variables leave that family without a key; the
    /// error surfaces only when a model routes to it.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read keys through `lookup` (environment variable name to value)
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let keys = ProviderFamily::ALL
            .into_iter()
            .filter_map(|family| {
                lookup(family.api_key_env())
                    .filter(|key| !key.trim().is_empty())
                    .map(|key| (family, key))
            })
            .collect();
        Self { keys }
    }

    /// Set the key for a family
    #[must_use]
    pub fn with_key(mut self, family: ProviderFamily, key: impl Into<String>) -> Self {
        self.keys.insert(family, key.into());
        self
    }

    /// Key for `family`
    ///
    /// # Errors
    /// Returns `MissingCredential` naming the variable to set
    pub fn key(&self, family: ProviderFamily) -> Result<&str> {
        self.keys
            .get(&family)
            .map(String::as_str)
            .ok_or_else(|| missing_credential(family))
    }

    /// Whether a key is present for `family`
    #[must_use]
    pub fn has(&self, family: ProviderFamily) -> bool {
        self.keys.contains_key(&family)
    }
}

pub(crate) fn missing_credential(family: ProviderFamily) -> Error {
    Error::MissingCredential {
        provider: family.to_string(),
        env_var: family.api_key_env().to_string(),
    }
}

/// Base URL overrides per provider family
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointOverrides {
    /// NVIDIA endpoint
    #[serde(default)]
    pub nvidia: Option<String>,
    /// OpenAI endpoint
    #[serde(default)]
    pub openai: Option<String>,
    /// Anyscale endpoint
    #[serde(default)]
    pub anyscale: Option<String>,
    /// DeepInfra endpoint
    #[serde(default)]
    pub deepinfra: Option<String>,
}

impl EndpointOverrides {
    /// Override for `family`, if any
    #[must_use]
    pub fn get(&self, family: ProviderFamily) -> Option<&str> {
        match family {
            ProviderFamily::Nvidia => self.nvidia.as_deref(),
            ProviderFamily::OpenAi => self.openai.as_deref(),
            ProviderFamily::Anyscale => self.anyscale.as_deref(),
            ProviderFamily::DeepInfra => self.deepinfra.as_deref(),
        }
    }

    /// Effective base URL for `family`
    #[must_use]
    pub fn base_url(&self, family: ProviderFamily) -> &str {
        self.get(family)
            .unwrap_or_else(|| family.default_base_url())
    }
}

/// Router configuration
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    /// Resolved credentials
    pub credentials: ProviderCredentials,
    /// Endpoint overrides
    pub endpoints: EndpointOverrides,
}

impl RouterConfig {
    /// Configuration with credentials and default endpoints
    #[must_use]
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self {
            credentials,
            endpoints: EndpointOverrides::default(),
        }
    }

    /// Set endpoint overrides
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: EndpointOverrides) -> Self {
        self.endpoints = endpoints;
        self
    }
}
