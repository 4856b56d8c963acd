//! Google Generative Language API provider implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{Provider, ProviderCapabilities};
use crate::error::LlmError;
use crate::protocol::google::{GoogleRequest, GoogleResponse};
use crate::types::{CompletionRequest, CompletionResponse};

/// Default Google Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Generative Language API provider
pub struct GoogleProvider {
    name: String,
    client: Client,
    base_url: Url,
    api_key: SecretString,
    timeout: Duration,
}

impl GoogleProvider {
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

    /// Build the `generateContent` endpoint URL for a model
    fn generate_url(&self, model: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/models/{model}:generateContent")
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities { tool_calling: true }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let wire_request = GoogleRequest::from(request);
        let url = self.generate_url(&request.model);

        tracing::debug!(
            provider = %self.name,
            model = %request.model,
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "sending generateContent request"
        );

        let builder = self
            .client
            .post(url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&wire_request);

        let wire_response: GoogleResponse = super::send(&self.name, builder, self.timeout).await?;

        Ok(wire_response.into())
    }
}
