//! Perplexity chat completions wire format types
//!
//! The API follows the `OpenAI` chat completions shape without tool calling.

use serde::{Deserialize, Serialize};

// -- Request types --

/// Perplexity chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerplexityRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<PerplexityMessage>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// Chat message on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerplexityMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    /// Plain text content
    pub content: String,
}

// -- Response types --

/// Perplexity chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerplexityResponse {
    /// Completion choices
    #[serde(default)]
    pub choices: Vec<PerplexityChoice>,
    /// Source URLs backing the answer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
}

/// Single completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerplexityChoice {
    /// Generated message
    #[serde(default)]
    pub message: Option<PerplexityResponseMessage>,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Generated message, content may be null
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerplexityResponseMessage {
    /// Role of the author
    #[serde(default)]
    pub role: Option<String>,
    /// Generated text
    #[serde(default)]
    pub content: Option<String>,
}
