use super::turn::{FunctionCall, Role, Turn};

/// Why the provider stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of the answer
    Stop,
    /// Provider refused or failed to produce content
    Error,
    /// Anything else the provider reported
    Other,
}

/// Normalized, provider-independent completion result
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// The model's turn
    pub turn: Turn,
    pub finish_reason: FinishReason,
}

impl CompletionResponse {
    /// A model turn holding a single explanatory text
    pub fn explanation(text: impl Into<String>, finish_reason: FinishReason) -> Self {
        Self {
            turn: Turn::text(Role::Model, text),
            finish_reason,
        }
    }

    /// Function calls the model emitted, in part order
    pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.turn.function_calls()
    }
}
