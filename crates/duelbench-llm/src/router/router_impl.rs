//! Provider router implementation
//!
//! Holds one backend per provider family and pairs it with the profile a
//! model identifier routes to. The router is immutable once built.

use super::config::{missing_credential, RouterConfig};
use super::profile::{profile_for, ProviderProfile};
use crate::completion::ModelRequest;
use crate::error::Result;
use crate::providers::compat::CompatConfig;
use crate::providers::openai::OpenAiConfig;
use crate::providers::{ChatBackend, ChatShape, CompatBackend, OpenAiBackend, ProviderFamily};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// A routing decision: profile plus the backend that serves it
#[derive(Clone)]
pub struct Route {
    /// Matched profile
    pub profile: &'static ProviderProfile,
    /// Backend for the profile's family
    pub backend: Arc<dyn ChatBackend>,
}

impl Route {
    /// Single-sample call shape for `request`
    #[must_use]
    pub fn shape(&self, request: &ModelRequest) -> ChatShape {
        self.profile.shape(request)
    }
}

/// Maps logical model identifiers to backends
#[derive(Default)]
pub struct ProviderRouter {
    backends: HashMap<ProviderFamily, Arc<dyn ChatBackend>>,
}

impl ProviderRouter {
    /// Router with no backends
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a backend for every family that has a credential
    ///
    /// # Errors
    /// Returns error if an HTTP client cannot be constructed
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let mut router = Self::new();

        for family in ProviderFamily::ALL {
            let Ok(api_key) = config.credentials.key(family) else {
                debug!(
                    provider = %family,
                    env = family.api_key_env(),
                    "No credential, provider disabled"
                );
                continue;
            };
            let base_url = config.endpoints.base_url(family);

            let backend: Arc<dyn ChatBackend> = match family {
                ProviderFamily::OpenAi => {
                    let mut openai = OpenAiConfig::new(api_key);
                    if let Some(url) = config.endpoints.get(family) {
                        openai = openai.with_base_url(url);
                    }
                    Arc::new(OpenAiBackend::new(openai))
                }
                _ => Arc::new(CompatBackend::new(
                    CompatConfig::new(family, api_key).with_base_url(base_url),
                )?),
            };

            router.register(backend);
            info!(provider = %family, base_url, "Registered provider");
        }

        Ok(router)
    }

    /// Register (or replace) the backend for its family
    pub fn register(&mut self, backend: Arc<dyn ChatBackend>) {
        let family = backend.family();
        debug!(provider = %family, "Registering backend");
        self.backends.insert(family, backend);
    }

    /// Builder form of `register`
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.register(backend);
        self
    }

    /// Whether a backend is registered for `family`
    #[must_use]
    pub fn has_backend(&self, family: ProviderFamily) -> bool {
        self.backends.contains_key(&family)
    }

    /// Profile for `model_id` (no backend lookup)
    #[must_use]
    pub fn profile(model_id: &str) -> &'static ProviderProfile {
        profile_for(model_id)
    }

    /// Route `model_id` to its profile and backend
    ///
    /// # Errors
    /// Returns `MissingCredential` when the profile's family has no backend
    pub fn route(&self, model_id: &str) -> Result<Route> {
        let profile = profile_for(model_id);
        let backend = self
            .backends
            .get(&profile.family)
            .cloned()
            .ok_or_else(|| missing_credential(profile.family))?;

        debug!(
            model = model_id,
            profile = ?profile.kind,
            provider = %profile.family,
            manual_sampling = profile.requires_manual_sampling,
            "Routed model"
        );

        Ok(Route { profile, backend })
    }
}
