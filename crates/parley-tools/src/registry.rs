use parley_config::{Config, LlmProviderType};
use parley_llm::ToolDeclaration;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Tools known to this domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    GenerateImage,
    GetWeather,
}

impl ToolName {
    /// Prompt-facing declaration; the description is the model's only
    /// guidance on when to call the tool
    pub fn declaration(self) -> ToolDeclaration {
        match self {
            Self::GenerateImage => ToolDeclaration {
                name: self.to_string(),
                description: "Generate an image from a text description. Call this whenever the user asks to \
                              draw, create, paint, sketch or otherwise produce a picture or illustration."
                    .to_owned(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "prompt": {
                            "type": "string",
                            "description": "Detailed description of the image to generate"
                        }
                    },
                    "required": ["prompt"]
                }),
            },
            Self::GetWeather => ToolDeclaration {
                name: self.to_string(),
                description: "Get the current weather conditions for a location. Call this whenever the user \
                              asks about the weather, temperature, forecast or conditions somewhere."
                    .to_owned(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "location": {
                            "type": "string",
                            "description": "City name, optionally with country, e.g. \"Tokyo, Japan\""
                        }
                    },
                    "required": ["location"]
                }),
            },
        }
    }
}

/// Credentials for the services backing each tool
///
/// Empty keys count as absent.
#[derive(Debug, Clone, Default)]
pub struct ToolCredentials {
    pub image: Option<SecretString>,
    pub weather: Option<SecretString>,
}

impl ToolCredentials {
    /// Collect tool credentials from configuration
    ///
    /// The image tool is only enabled by a `[tools.image]` section; its key
    /// falls back to the first Google provider's key.
    pub fn from_config(config: &Config) -> Self {
        let image = config.tools.image.as_ref().and_then(|image| {
            image.api_key.clone().or_else(|| {
                config
                    .llm
                    .providers
                    .values()
                    .find(|provider| provider.provider_type == LlmProviderType::Google)
                    .and_then(|provider| provider.api_key.clone())
            })
        });

        let weather = config.tools.weather.as_ref().and_then(|weather| weather.api_key.clone());

        Self {
            image: non_empty(image),
            weather: non_empty(weather),
        }
    }

    /// Whether the service behind a tool has a credential
    pub fn has(&self, tool: ToolName) -> bool {
        match tool {
            ToolName::GenerateImage => self.image.is_some(),
            ToolName::GetWeather => self.weather.is_some(),
        }
    }
}

fn non_empty(key: Option<SecretString>) -> Option<SecretString> {
    key.filter(|key| !key.expose_secret().trim().is_empty())
}

/// Declarations for every tool whose backing service is configured
///
/// Tools without credentials are left out silently.
pub fn available_tools(credentials: &ToolCredentials) -> Vec<ToolDeclaration> {
    ToolName::iter()
        .filter(|tool| credentials.has(*tool))
        .map(ToolName::declaration)
        .collect()
}
