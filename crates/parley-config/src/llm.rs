use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Top-level LLM configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// LLM provider configurations keyed by name
    #[serde(default)]
    pub providers: IndexMap<String, LlmProviderConfig>,
}

impl LlmConfig {
    /// Find the provider that answers for a model identifier
    ///
    /// `provider/model` selects the named provider. A bare model matches a
    /// provider's explicit `models` list first, then its model family.
    pub fn provider_for_model(&self, model: &str) -> Option<(&str, &LlmProviderConfig)> {
        if let Some((name, _)) = model.split_once('/') {
            return self.providers.get_key_value(name).map(|(k, v)| (k.as_str(), v));
        }

        let explicit = self
            .providers
            .iter()
            .find(|(_, provider)| provider.models.iter().any(|m| m == model));

        explicit
            .or_else(|| {
                let family = LlmProviderType::for_model(model)?;
                self.providers.iter().find(|(_, provider)| provider.provider_type == family)
            })
            .map(|(k, v)| (k.as_str(), v))
    }
}

/// Configuration for a single LLM provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmProviderConfig {
    /// Provider protocol type
    #[serde(rename = "type")]
    pub provider_type: LlmProviderType,
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model identifiers this provider answers for, beyond its model family
    #[serde(default)]
    pub models: Vec<String>,
}

/// Supported LLM provider protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderType {
    /// Google Generative Language API, with native function calling
    Google,
    /// Perplexity chat completions, text only
    Perplexity,
}

impl LlmProviderType {
    /// Model name prefixes served by each provider family
    pub const fn model_families(self) -> &'static [&'static str] {
        match self {
            Self::Google => &["gemini", "gemma"],
            Self::Perplexity => &["sonar", "r1-1776"],
        }
    }

    /// Infer the provider family from a bare model identifier
    pub fn for_model(model: &str) -> Option<Self> {
        [Self::Google, Self::Perplexity]
            .into_iter()
            .find(|family| family.model_families().iter().any(|prefix| model.starts_with(prefix)))
    }
}
