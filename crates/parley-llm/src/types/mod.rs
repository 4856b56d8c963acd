//! Provider-agnostic conversation types
//!
//! Every wire format converts to and from these shapes, and they are the
//! only shapes the orchestrator operates on.

pub mod request;
pub mod response;
pub mod tool;
pub mod turn;

pub use request::{CompletionRequest, GenerationOptions};
pub use response::{CompletionResponse, FinishReason};
pub use tool::ToolDeclaration;
pub use turn::{FunctionCall, FunctionResult, InlineMedia, Part, Role, Turn};
