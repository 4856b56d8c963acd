use std::time::Duration;

use serde::Deserialize;

/// Instruction sent with every chat completion
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a friendly, helpful assistant. Answer clearly and concisely. \
When the user asks for a picture, drawing or any other image, call the generate_image tool. \
When the user asks about current weather conditions somewhere, call the get_weather tool.";

/// Turn orchestration settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Model used when the request names none
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Function-calling model asked to act on a text-only answer
    #[serde(default = "default_model")]
    pub delegate_model: String,
    /// Model used for the auxiliary title task
    #[serde(default = "default_title_model")]
    pub title_model: String,
    /// Fixed system instruction for chat completions
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
    /// Upper bound for each completion call
    #[serde(default = "default_provider_timeout", with = "crate::duration")]
    pub provider_timeout: Duration,
    /// Upper bound for each tool dispatch
    #[serde(default = "default_tool_timeout", with = "crate::duration")]
    pub tool_timeout: Duration,
    /// Upper bound for the title task
    #[serde(default = "default_title_timeout", with = "crate::duration")]
    pub title_timeout: Duration,
    /// How long a finished answer waits for a pending title
    #[serde(default = "default_title_grace", with = "crate::duration")]
    pub title_grace: Duration,
    /// Tool-call rounds per run (1 to 3)
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u8,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            delegate_model: default_model(),
            title_model: default_title_model(),
            system_instruction: default_system_instruction(),
            provider_timeout: default_provider_timeout(),
            tool_timeout: default_tool_timeout(),
            title_timeout: default_title_timeout(),
            title_grace: default_title_grace(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_owned()
}

fn default_title_model() -> String {
    "gemini-2.0-flash-lite".to_owned()
}

fn default_system_instruction() -> String {
    DEFAULT_SYSTEM_INSTRUCTION.to_owned()
}

const fn default_provider_timeout() -> Duration {
    Duration::from_secs(30)
}

const fn default_tool_timeout() -> Duration {
    Duration::from_secs(45)
}

const fn default_title_timeout() -> Duration {
    Duration::from_secs(10)
}

const fn default_title_grace() -> Duration {
    Duration::from_millis(500)
}

const fn default_max_tool_rounds() -> u8 {
    1
}
