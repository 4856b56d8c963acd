//! Provider wire formats
//!
//! Each module defines serde types matching a specific provider API.

pub mod google;
pub mod perplexity;
