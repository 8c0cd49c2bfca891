//! Shared resource setup.
//!
//! This module provides functions to initialize the resources a program
//! using this library typically sets up once:
//! - The logger (plain or JSON output)
//! - A `reqwest` transport with its client built up front
//! - A client or session over that transport
//!
//! All initialization functions return `InitializationError` instead of panicking.

mod client;
mod logger;

// Re-export public API
pub use client::{init_client, init_session, init_transport};
pub use logger::init_logger_with;
