//! Tool registry and dispatcher for Parley
//!
//! Declares the tools a function-calling model may invoke and executes the
//! calls it emits. Execution never fails outward: every failure is folded
//! into a [`ToolCallResult`] the model can read.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod dispatcher;
mod error;
pub mod image;
mod registry;
mod result;
pub mod weather;

pub use dispatcher::{Tool, ToolDispatcher, ToolOutput};
pub use error::ToolError;
pub use registry::{ToolCredentials, ToolName, available_tools};
pub use result::ToolCallResult;
