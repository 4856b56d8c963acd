#![allow(clippy::must_use_candidate)]

pub mod anti_abuse;
pub mod chat;
pub mod cors;
mod duration;
mod env;
pub mod health;
pub mod llm;
mod loader;
pub mod server;
pub mod telemetry;
pub mod tools;

use serde::Deserialize;

pub use anti_abuse::*;
pub use chat::*;
pub use cors::*;
pub use health::*;
pub use llm::*;
pub use server::*;
pub use telemetry::*;
pub use tools::*;

/// Top-level Parley configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Turn orchestration settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// Tool backends (image generation, weather)
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Anti-abuse verification gate
    #[serde(default)]
    pub anti_abuse: Option<AntiAbuseConfig>,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
