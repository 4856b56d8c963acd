use std::time::Duration;

use thiserror::Error;

/// Failure of a single tool execution
///
/// The display text is what the model reads back as the tool's own
/// explanation, so it is written for the model rather than an operator.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required argument was absent or blank
    #[error("{hint}")]
    MissingArgument {
        argument: &'static str,
        hint: &'static str,
    },

    /// The backing service failed or could not be reached
    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// The backing service answered without a usable result
    #[error("{0}")]
    EmptyPayload(&'static str),

    /// The tool did not finish within the configured bound
    #[error("{tool} did not respond within {after:?}")]
    Timeout { tool: String, after: Duration },

    /// The model named a tool that is not registered
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
}

impl ToolError {
    /// Short failure kind for structured logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingArgument { .. } => "missing_argument",
            Self::Upstream { .. } => "upstream",
            Self::EmptyPayload(_) => "empty_payload",
            Self::Timeout { .. } => "timeout",
            Self::UnknownTool(_) => "unknown_tool",
        }
    }
}
