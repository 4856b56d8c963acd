use async_trait::async_trait;
use parley_config::AntiAbuseConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::GateError;

/// Pass/fail gate consulted before orchestration begins
#[async_trait]
pub trait AbuseGate: Send + Sync {
    /// Accept or reject a client-supplied token
    async fn verify(&self, token: Option<&str>) -> Result<(), GateError>;
}

/// reCAPTCHA v3 style `siteverify` response
#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verifies tokens against a reCAPTCHA-compatible scoring endpoint
pub struct RecaptchaVerifier {
    http: reqwest::Client,
    verify_url: Url,
    secret: SecretString,
    min_score: f64,
}

impl RecaptchaVerifier {
    /// Create a verifier from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no secret is configured or the HTTP client
    /// cannot be built
    pub fn new(config: &AntiAbuseConfig) -> anyhow::Result<Self> {
        let secret = config
            .secret
            .clone()
            .filter(|secret| !secret.expose_secret().trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("anti_abuse.secret is required when the gate is enabled"))?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            verify_url: config.verify_url.clone(),
            secret,
            min_score: config.min_score,
        })
    }
}

#[async_trait]
impl AbuseGate for RecaptchaVerifier {
    async fn verify(&self, token: Option<&str>) -> Result<(), GateError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty()).ok_or(GateError::MissingToken)?;

        let response = self
            .http
            .post(self.verify_url.clone())
            .form(&[("secret", self.secret.expose_secret()), ("response", token)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "anti-abuse verifier unreachable");
                GateError::Verification(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "anti-abuse verifier returned error");
            return Err(GateError::Unverified(vec![format!("verifier returned {status}")]));
        }

        let verdict: SiteVerifyResponse = response.json().await?;

        if !verdict.success {
            tracing::info!(codes = ?verdict.error_codes, "anti-abuse token not accepted");
            return Err(GateError::Unverified(verdict.error_codes));
        }

        // Tokens without a score cannot prove they clear the threshold
        let score = verdict.score.unwrap_or(0.0);
        if score < self.min_score {
            tracing::info!(score, threshold = self.min_score, action = ?verdict.action, "anti-abuse score too low");
            return Err(GateError::Rejected {
                score,
                threshold: self.min_score,
            });
        }

        tracing::debug!(score, "anti-abuse verification passed");
        Ok(())
    }
}
