//! Configuration types.
//!
//! This module defines the enums and structs used to configure logging,
//! clients, requests and sessions.

use std::time::Duration;

use crate::config::constants::{
    DEFAULT_ACCEPT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_WRITE_TIMEOUT, DEFAULT_REDIRECT_MAX,
    DEFAULT_SESSION_USER_AGENT, DEFAULT_USER_AGENT,
};

/// Logging level for the library.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Connect and read/write timeouts applied to every exchange.
///
/// Exceeding either one is a transport failure; nothing is retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Timeouts {
    /// Time allowed to establish the connection
    pub connect: Duration,
    /// Time allowed to write the request and read the response once connected
    pub read_write: Duration,
}

impl Timeouts {
    /// Creates a timeout pair.
    pub fn new(connect: Duration, read_write: Duration) -> Self {
        Self {
            connect,
            read_write,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_WRITE_TIMEOUT)
    }
}

/// Which status codes count as redirects for each method class.
///
/// | Variant   | GET / HEAD              | POST / PUT          |
/// |-----------|-------------------------|---------------------|
/// | `Strict`  | 301, 302, 303, 307      | 302, 303            |
/// | `Lenient` | 301, 302, 303, 307, 308 | 302, 303, 307, 308  |
///
/// Any other method is sent once and never redirected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedirectEligibility {
    /// The documented default policy
    #[default]
    Strict,
    /// Also follows 307/308 for POST/PUT (keeping the method) and 308 for GET/HEAD
    Lenient,
}

/// Client-level policy: redirects and timeouts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Follow redirect-eligible responses. When false the first redirect
    /// response is returned with its `redirect_forbidden` marker set.
    pub allow_redirects: bool,

    /// Maximum length of the via chain before `TooManyRedirects`
    pub redirect_max: usize,

    /// Status code table used to decide redirect eligibility
    pub eligibility: RedirectEligibility,

    /// Per-exchange timeouts
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            allow_redirects: true,
            redirect_max: DEFAULT_REDIRECT_MAX,
            eligibility: RedirectEligibility::Strict,
            timeouts: Timeouts::default(),
        }
    }
}

/// Headers stamped on every request built by the free functions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestDefaults {
    /// `User-Agent` header value
    pub user_agent: String,
    /// `Accept` header value
    pub accept: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

/// Session configuration.
///
/// # Examples
///
/// ```
/// use requests::config::SessionConfig;
///
/// let config = SessionConfig {
///     user_agent: "Mozilla/5.0".to_string(),
///     ..Default::default()
/// };
/// assert!(config.client.allow_redirects);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// `User-Agent` header value stamped on every request the session issues
    pub user_agent: String,

    /// Policy of the session's client
    pub client: ClientConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_SESSION_USER_AGENT.to_string(),
            client: ClientConfig::default(),
        }
    }
}
