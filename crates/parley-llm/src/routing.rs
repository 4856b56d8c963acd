//! Model resolution
//!
//! Resolves a requested model identifier to a configured provider and the
//! model id that provider expects.

use std::sync::Arc;
use std::time::Duration;

use parley_config::{LlmConfig, LlmProviderType};
use reqwest::Client;
use secrecy::ExposeSecret;

use crate::error::LlmError;
use crate::provider::Provider;
use crate::provider::google::GoogleProvider;
use crate::provider::perplexity::PerplexityProvider;

/// Resolved target for a model request
#[derive(Clone)]
pub struct ResolvedModel {
    /// Provider serving the model
    pub provider: Arc<dyn Provider>,
    /// Actual model identifier to send to the provider
    pub model_id: String,
}

impl std::fmt::Debug for ResolvedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedModel")
            .field("provider", &self.provider.name())
            .field("model_id", &self.model_id)
            .finish()
    }
}

/// One configured provider
struct Route {
    name: String,
    family: LlmProviderType,
    models: Vec<String>,
    /// Absent when the provider has no usable API key
    provider: Option<Arc<dyn Provider>>,
}

/// Model routing table
#[derive(Default)]
pub struct ModelRouter {
    routes: Vec<Route>,
}

impl ModelRouter {
    /// Build providers for every configured entry
    ///
    /// Providers without an API key stay in the table so that requests for
    /// their models fail with a configuration error instead of "not found".
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Internal` if a provider cannot be constructed.
    pub fn new(config: &LlmConfig, client: &Client, timeout: Duration) -> Result<Self, LlmError> {
        let mut router = Self::default();

        for (name, provider_config) in &config.providers {
            let api_key = provider_config
                .api_key
                .clone()
                .filter(|key| !key.expose_secret().trim().is_empty());

            let provider: Option<Arc<dyn Provider>> = match (api_key, provider_config.provider_type) {
                (None, _) => {
                    tracing::warn!(provider = %name, "no API key configured, requests for its models will fail");
                    None
                }
                (Some(key), LlmProviderType::Google) => Some(Arc::new(GoogleProvider::new(
                    name.clone(),
                    client.clone(),
                    provider_config.base_url.clone(),
                    key,
                    timeout,
                )?)),
                (Some(key), LlmProviderType::Perplexity) => Some(Arc::new(PerplexityProvider::new(
                    name.clone(),
                    client.clone(),
                    provider_config.base_url.clone(),
                    key,
                    timeout,
                )?)),
            };

            router = router.with_route(name, provider_config.provider_type, &provider_config.models, provider);
        }

        Ok(router)
    }

    /// Register a provider under a name and model family
    #[must_use]
    pub fn with_route(
        mut self,
        name: &str,
        family: LlmProviderType,
        models: &[String],
        provider: Option<Arc<dyn Provider>>,
    ) -> Self {
        self.routes.push(Route {
            name: name.to_owned(),
            family,
            models: models.to_vec(),
            provider,
        });
        self
    }

    /// Resolve a model name to a provider and model identifier
    ///
    /// Supports `provider_name/model_name` for explicit selection, an exact
    /// match against a provider's model list, and finally the model family
    /// implied by the name.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::ModelNotFound` if no provider serves the model and
    /// `LlmError::MissingCredential` if the serving provider has no API key.
    pub fn resolve(&self, model: &str) -> Result<ResolvedModel, LlmError> {
        let (route, model_id) = self.find_route(model).ok_or_else(|| LlmError::ModelNotFound {
            model: model.to_owned(),
        })?;

        let provider = route.provider.clone().ok_or_else(|| LlmError::MissingCredential {
            provider: route.name.clone(),
        })?;

        Ok(ResolvedModel {
            provider,
            model_id: model_id.to_owned(),
        })
    }

    fn find_route<'a>(&self, model: &'a str) -> Option<(&Route, &'a str)> {
        if let Some((provider_name, model_id)) = model.split_once('/')
            && let Some(route) = self.routes.iter().find(|route| route.name == provider_name)
        {
            return Some((route, model_id));
        }

        if let Some(route) = self.routes.iter().find(|route| route.models.iter().any(|m| m == model)) {
            return Some((route, model));
        }

        let family = LlmProviderType::for_model(model)?;
        self.routes
            .iter()
            .find(|route| route.family == family)
            .map(|route| (route, model))
    }
}
