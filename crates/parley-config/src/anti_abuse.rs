use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// reCAPTCHA-style verification gate consulted before orchestration
///
/// The section is mandatory; `enabled = false` is the only way to serve
/// without verification.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AntiAbuseConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Server-side verification secret, required while enabled
    #[serde(default)]
    pub secret: Option<SecretString>,
    /// Scoring endpoint
    #[serde(default = "default_verify_url")]
    pub verify_url: Url,
    /// Minimum accepted score (0.0 to 1.0)
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Upper bound for the verification call
    #[serde(default = "default_timeout", with = "crate::duration")]
    pub timeout: Duration,
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

fn default_verify_url() -> Url {
    Url::parse("https://www.google.com/recaptcha/api/siteverify").expect("valid default URL")
}

#[allow(clippy::missing_const_for_fn)]
fn default_min_score() -> f64 {
    0.5
}

const fn default_timeout() -> Duration {
    Duration::from_secs(5)
}
