use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Tool backend configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Image synthesis through an image-capable Gemini model
    #[serde(default)]
    pub image: Option<ImageToolConfig>,
    /// Current weather conditions through OpenWeatherMap
    #[serde(default)]
    pub weather: Option<WeatherToolConfig>,
}

/// Image generation backend
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageToolConfig {
    /// Image-capable model identifier
    #[serde(default = "default_image_model")]
    pub model: String,
    /// API key, falls back to the first Google LLM provider's key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
}

impl Default for ImageToolConfig {
    fn default() -> Self {
        Self {
            model: default_image_model(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Weather lookup backend
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherToolConfig {
    /// OpenWeatherMap API key; the tool is disabled without one
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
}

fn default_image_model() -> String {
    "gemini-2.0-flash-preview-image-generation".to_owned()
}
