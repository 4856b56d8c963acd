use serde::{Deserialize, Serialize};

/// A tool the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// Unique name within one registry snapshot
    pub name: String,
    /// Prompt-facing guidance on when to call the tool
    pub description: String,
    /// JSON Schema describing the arguments
    pub parameters: serde_json::Value,
}
