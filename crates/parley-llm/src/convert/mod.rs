//! Conversion between provider-agnostic types and provider wire formats
//!
//! Requests convert with `From<&CompletionRequest>` and responses with
//! `From<WireResponse> for CompletionResponse`, so both directions stay pure.

pub mod google;
pub mod perplexity;
