//! Error handling.
//!
//! This module provides:
//! - The library `Error` enum and `Result` alias
//! - Transport error categories and `reqwest` error categorization
//! - Initialization errors for the logger and transport
//!
//! Nothing in this library retries. Every error is terminal for the call that
//! produced it; retry and backoff belong to the caller.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, operation_tag};
pub use types::{Error, InitializationError, Result, TransportError, TransportErrorKind};
