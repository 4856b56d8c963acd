//! Provider adapters for Parley
//!
//! Normalizes the Google Generative Language API (native function calling)
//! and Perplexity's chat completions API (text only) behind one
//! [`Provider`] trait that speaks in [`Turn`]s.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod routing;
pub mod types;

pub use error::LlmError;
pub use provider::{Provider, ProviderCapabilities};
pub use routing::{ModelRouter, ResolvedModel};
pub use types::{
    CompletionRequest, CompletionResponse, FinishReason, FunctionCall, FunctionResult, GenerationOptions, InlineMedia,
    Part, Role, ToolDeclaration, Turn,
};
