use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End-user message
    User,
    /// Model response
    Model,
    /// Synthesized tool results
    Tool,
}

/// One message-equivalent unit of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    /// A single-text turn
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text of all text parts
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("")
    }

    /// Function calls carried by this turn, in part order
    pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.parts.iter().filter_map(|part| match part {
            Part::FunctionCall(call) => Some(call),
            _ => None,
        })
    }

    /// Whether any part is a function call
    pub fn has_function_calls(&self) -> bool {
        self.function_calls().next().is_some()
    }

    /// Whether at least one part carries usable content
    pub fn has_content(&self) -> bool {
        self.parts.iter().any(|part| match part {
            Part::Text(text) => !text.trim().is_empty(),
            Part::InlineMedia(media) => !media.data.is_empty(),
            Part::FunctionCall(_) | Part::FunctionResult(_) => true,
        })
    }
}

/// One piece of content within a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Text(String),
    InlineMedia(InlineMedia),
    FunctionCall(FunctionCall),
    FunctionResult(FunctionResult),
}

impl Part {
    /// Text of a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Binary media carried inline as base64
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineMedia {
    /// MIME type (e.g. "image/png")
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// Structured request from the model to run a named operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl FunctionCall {
    /// String argument by name, treating blank values as absent
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.args
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Result of a function call, fed back to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub name: String,
    #[serde(default)]
    pub response: Map<String, Value>,
}
