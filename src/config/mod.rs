//! Library configuration and constants.
//!
//! This module provides:
//! - Default values (timeouts, redirect limits, header values)
//! - Configuration types for clients, sessions and logging
//!
//! Nothing here is global mutable state: every constructor takes its
//! configuration explicitly and falls back to these defaults.

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    ClientConfig, LogFormat, LogLevel, RedirectEligibility, RequestDefaults, SessionConfig,
    Timeouts,
};
