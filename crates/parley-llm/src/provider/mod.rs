//! Provider trait and implementations for LLM backends

pub mod google;
pub mod perplexity;

use std::time::Duration;

use async_trait::async_trait;
use parley_core::upstream_message;

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse};

/// Capabilities advertised by a provider
#[derive(Debug, Clone, Copy)]
pub struct ProviderCapabilities {
    /// Whether the provider emits structured function calls
    pub tool_calling: bool,
}

/// Trait implemented by each LLM provider backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Advertised capabilities
    fn capabilities(&self) -> ProviderCapabilities;

    /// Send a completion request and normalize the answer
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

/// Send a prepared request with an upper bound, mapping failures to [`LlmError`]
///
/// Non-success statuses carry the message extracted from the upstream body.
pub(crate) async fn send<T>(
    provider: &str,
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<T, LlmError>
where
    T: serde::de::DeserializeOwned,
{
    let exchange = async {
        let response = request.send().await.map_err(|e| {
            tracing::error!(provider = %provider, error = %e, "upstream request failed");
            LlmError::upstream(None, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body);
            tracing::warn!(
                provider = %provider,
                status = %status,
                message = %message,
                "upstream returned error"
            );
            return Err(LlmError::upstream(Some(status.as_u16()), message));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!(provider = %provider, error = %e, "malformed upstream response");
            LlmError::upstream(Some(status.as_u16()), format!("failed to parse response: {e}"))
        })
    };

    tokio::time::timeout(timeout, exchange).await.map_err(|_| {
        tracing::warn!(provider = %provider, timeout = ?timeout, "upstream request timed out");
        LlmError::Timeout {
            provider: provider.to_owned(),
            after: timeout,
        }
    })?
}
