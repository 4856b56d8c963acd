use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use parley_auth::GateError;
use parley_core::HttpError;
use parley_llm::LlmError;
use strum::Display;
use thiserror::Error;

/// Orchestration stage that issued a provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Select,
    Primary,
    Delegation,
    FollowUp,
}

/// Terminal failures of a chat request
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Required provider or credential absent
    #[error("{0}")]
    Configuration(String),

    /// Verification failed or scored below threshold
    #[error(transparent)]
    AntiAbuse(#[from] GateError),

    /// Primary or follow-up completion failed
    #[error("{stage} completion failed: {source}")]
    Upstream { stage: Stage, source: LlmError },

    /// No usable completion turn after all processing
    #[error("{0}")]
    ResponseShape(String),
}

impl ChatError {
    /// Attribute a provider failure to the stage that issued the call
    pub fn provider(stage: Stage, error: LlmError) -> Self {
        if error.is_configuration() {
            Self::Configuration(error.to_string())
        } else {
            Self::Upstream { stage, source: error }
        }
    }

    /// Upstream HTTP status behind an upstream failure, if any
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream {
                source: LlmError::Upstream { status, .. },
                ..
            } => *status,
            _ => None,
        }
    }
}

impl HttpError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AntiAbuse(e) => e.status_code(),
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::ResponseShape(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Configuration(_) => "configuration_error",
            Self::AntiAbuse(e) => e.error_type(),
            Self::Upstream { .. } => "upstream_provider_error",
            Self::ResponseShape(_) => "response_shape_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::AntiAbuse(e) => e.client_message(),
            Self::Upstream { stage, source } => format!("{stage} completion failed: {}", source.client_message()),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.error_type(), "chat request failed");
        } else {
            tracing::info!(error = %self, kind = self.error_type(), "chat request rejected");
        }

        (status, Json(self.to_body())).into_response()
    }
}
