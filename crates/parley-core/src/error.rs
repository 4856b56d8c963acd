use http::StatusCode;
use serde::Serialize;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. The server layer
/// converts these into actual HTTP responses, keeping domain errors
/// decoupled from axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error category (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;

    /// Build the JSON body returned to the client
    fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.error_type().to_owned(),
            details: Some(self.client_message()).filter(|m| !m.is_empty()),
        }
    }
}

/// Failure body returned to the chat client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Machine-checkable error category
    pub error: String,
    /// Human-readable explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
