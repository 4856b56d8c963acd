//! Google Generative Language API wire format types

use serde::{Deserialize, Serialize};

// -- Request types --

/// Google `generateContent` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleRequest {
    /// Conversation contents
    pub contents: Vec<GoogleContent>,
    /// System instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GoogleContent>,
    /// Generation configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GoogleGenerationConfig>,
    /// Tool definitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<GoogleTool>>,
}

/// Google content object containing role and parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleContent {
    /// Role ("user", "model" or "function")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts
    #[serde(default)]
    pub parts: Vec<GooglePart>,
}

/// Individual part within a Google content object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GooglePart {
    /// Text content
    Text(String),
    /// Inline data (e.g. images)
    InlineData(GoogleInlineData),
    /// Function call from the model
    FunctionCall(GoogleFunctionCall),
    /// Function response from the caller
    FunctionResponse(GoogleFunctionResponse),
}

/// Inline binary data (images, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleInlineData {
    /// MIME type (e.g. "image/png")
    pub mime_type: String,
    /// Base64-encoded data
    pub data: String,
}

/// Function call from the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleFunctionCall {
    /// Function name
    pub name: String,
    /// Function arguments as JSON
    #[serde(default)]
    pub args: serde_json::Value,
}

/// Function response from the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleFunctionResponse {
    /// Function name
    pub name: String,
    /// Response content as JSON
    pub response: serde_json::Value,
}

/// Generation configuration parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenerationConfig {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Maximum output tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    /// Output modalities, `["TEXT", "IMAGE"]` for image-capable models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

/// Google tool definition wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleTool {
    /// Function declarations
    pub function_declarations: Vec<GoogleFunctionDeclaration>,
}

/// Google function declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleFunctionDeclaration {
    /// Function name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for parameters
    pub parameters: serde_json::Value,
}

// -- Response types --

/// Google `generateContent` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GoogleCandidate>,
    /// Set when the prompt itself was blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<GooglePromptFeedback>,
}

/// Generated candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCandidate {
    /// Generated content, absent when the candidate was blocked
    #[serde(default)]
    pub content: Option<GoogleContent>,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt-level feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePromptFeedback {
    /// Reason the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}
