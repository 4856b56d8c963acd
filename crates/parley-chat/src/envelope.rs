use parley_llm::{GenerationOptions, Turn};
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// What the client wants done with the conversation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Answer the conversation
    #[default]
    Chat,
    /// Answer and also propose a short conversation title
    TitleAndChat,
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation so far, oldest first
    #[serde(default)]
    pub history: Vec<Turn>,
    /// Model identifier, selecting the provider
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub generation_options: Option<GenerationOptions>,
    #[serde(default)]
    pub task: Task,
    #[serde(default)]
    pub anti_abuse_token: Option<String>,
}

impl ChatRequest {
    /// Check the preconditions that do not need any collaborator
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.history.is_empty() {
            return Err(ChatError::Validation("history must contain at least one turn".to_owned()));
        }

        if let Some(index) = self.history.iter().position(|turn| turn.parts.is_empty()) {
            return Err(ChatError::Validation(format!("turn {index} has no parts")));
        }

        Ok(())
    }

    /// Requested model, treating a blank value as absent
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

/// Successful response body
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Turns appended by this run, ending with the closing model turn
    pub turns: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
