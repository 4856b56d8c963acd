use serde::{Deserialize, Serialize};

use super::tool::ToolDeclaration;
use super::turn::Turn;

/// Recognized generation knobs; unknown keys are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Provider-agnostic completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier as understood by the provider
    pub model: String,
    /// Conversation so far
    pub history: Vec<Turn>,
    /// Fixed system instruction
    pub system_instruction: Option<String>,
    /// Tools the model may call
    pub tools: Option<Vec<ToolDeclaration>>,
    /// Generation knobs
    pub options: GenerationOptions,
    /// Ask for image output alongside text
    pub image_output: bool,
}

impl CompletionRequest {
    /// Request with no tools, instruction, or options
    pub fn new(model: impl Into<String>, history: Vec<Turn>) -> Self {
        Self {
            model: model.into(),
            history,
            system_instruction: None,
            tools: None,
            options: GenerationOptions::default(),
            image_output: false,
        }
    }

    /// Attach tools, leaving them off entirely when the set is empty
    #[must_use]
    pub fn with_tools(mut self, tools: &[ToolDeclaration]) -> Self {
        self.tools = (!tools.is_empty()).then(|| tools.to_vec());
        self
    }
}
