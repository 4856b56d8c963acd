use http::StatusCode;
use parley_core::HttpError;

/// Anti-abuse verification failures
///
/// Every variant rejects the request: an unreachable verifier fails closed.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Request carried no verification token
    #[error("anti-abuse token is required")]
    MissingToken,

    /// Verifier accepted the token but scored it below the threshold
    #[error("verification score {score} is below the required {threshold}")]
    Rejected { score: f64, threshold: f64 },

    /// Verifier did not accept the token
    #[error("verification failed: {}", if .0.is_empty() { "no reason given".to_owned() } else { .0.join(", ") })]
    Unverified(Vec<String>),

    /// HTTP request to the verifier failed
    #[error("verification request failed: {0}")]
    Verification(#[from] reqwest::Error),
}

impl HttpError for GateError {
    fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }

    fn error_type(&self) -> &str {
        "anti_abuse_rejected"
    }

    fn client_message(&self) -> String {
        match self {
            Self::Verification(_) => "anti-abuse verification is unavailable".to_owned(),
            other => other.to_string(),
        }
    }
}
