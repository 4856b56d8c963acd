//! Perplexity chat completions provider implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{Provider, ProviderCapabilities};
use crate::error::LlmError;
use crate::protocol::perplexity::{PerplexityRequest, PerplexityResponse};
use crate::types::{CompletionRequest, CompletionResponse};

/// Default Perplexity API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Perplexity provider, text only
pub struct PerplexityProvider {
    name: String,
    client: Client,
    base_url: Url,
    api_key: SecretString,
    timeout: Duration,
}

impl PerplexityProvider {
    /// Create a provider for a base URL, falling back to the public endpoint
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Internal` if the default base URL cannot be parsed.
    pub fn new(
        name: impl Into<String>,
        client: Client,
        base_url: Option<Url>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base_url = match base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).map_err(|e| LlmError::Internal(e.into()))?,
        };

        Ok(Self {
            name: name.into(),
            client,
            base_url,
            api_key,
            timeout,
        })
    }
}

#[async_trait]
impl Provider for PerplexityProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities { tool_calling: false }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let wire_request = PerplexityRequest::from(request);
        let base = self.base_url.as_str().trim_end_matches('/');
        let url = format!("{base}/chat/completions");

        tracing::debug!(provider = %self.name, model = %request.model, "sending chat completion request");

        let builder = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&wire_request);

        let wire_response: PerplexityResponse = super::send(&self.name, builder, self.timeout).await?;

        Ok(wire_response.into())
    }
}
