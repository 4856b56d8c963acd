//! Turn orchestration for Parley
//!
//! Drives one conversation turn: select a provider, call it, dispatch any
//! tool calls it emits, feed the results back, and reconcile generated
//! media into the closing model turn.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod envelope;
mod error;
mod handler;
mod intent;
mod orchestrator;
mod title;

pub use envelope::{ChatRequest, ChatResponse, Task};
pub use error::{ChatError, Stage};
pub use handler::{ChatState, chat_router};
pub use intent::{IntentDetector, KeywordIntents};
pub use orchestrator::{Orchestrator, OrchestratorSettings, TurnOutcome, TurnRequest};
pub use title::TitleGenerator;
