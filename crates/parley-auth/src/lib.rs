//! Anti-abuse verification gate
//!
//! Consulted once per chat request, before any provider is called.

mod error;
mod verifier;

pub use error::GateError;
pub use verifier::{AbuseGate, RecaptchaVerifier};
