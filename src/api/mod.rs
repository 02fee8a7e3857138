//! API client layer - REST calls against the configured base URL
//!
//! Failures are normalized by [`handle_failure`] into a uniform shape.

pub mod calls;
pub mod client;
pub mod error;

pub use calls::{ApiCall, Reply};
pub use client::ApiClient;
pub use error::{handle_failure, ApiResponse, Handled, RequestFailure};
