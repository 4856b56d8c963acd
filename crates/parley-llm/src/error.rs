use std::time::Duration;

use http::StatusCode;
use parley_core::HttpError;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Upstream provider returned an error or could not be reached
    #[error("{}", upstream_display(*.status, .message))]
    Upstream {
        /// Upstream HTTP status, absent for transport failures
        status: Option<u16>,
        /// Best-effort message extracted from the upstream body
        message: String,
    },

    /// Provider did not answer within the configured bound
    #[error("provider {provider} did not respond within {after:?}")]
    Timeout { provider: String, after: Duration },

    /// Requested model is not served by any configured provider
    #[error("no configured provider serves model '{model}'")]
    ModelNotFound { model: String },

    /// Provider for the requested model has no API key
    #[error("API key not configured for provider '{provider}'")]
    MissingCredential { provider: String },

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn upstream_display(status: Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("provider returned {status}: {message}"),
        None => format!("provider request failed: {message}"),
    }
}

impl LlmError {
    /// Whether the failure is a configuration problem rather than an upstream one
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::ModelNotFound { .. } | Self::MissingCredential { .. })
    }

    pub(crate) fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }
}

impl HttpError for LlmError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream { .. } | Self::Timeout { .. } => StatusCode::BAD_GATEWAY,
            Self::ModelNotFound { .. } | Self::MissingCredential { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Upstream { .. } | Self::Timeout { .. } => "upstream_provider_error",
            Self::ModelNotFound { .. } | Self::MissingCredential { .. } => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}
