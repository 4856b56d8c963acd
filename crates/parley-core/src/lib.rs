#![allow(clippy::must_use_candidate)]

mod error;
mod upstream;

pub use error::{ErrorBody, HttpError};
pub use upstream::upstream_message;
