//! Configuration constants.
//!
//! This module defines the defaults used when a client, request or session is
//! built without explicit configuration.

use std::time::Duration;

// Redirect handling
/// Maximum number of redirect hops to follow
/// A chain of this many redirects or more fails with `TooManyRedirects`
pub const DEFAULT_REDIRECT_MAX: usize = 10;

// Network operation timeouts
/// TCP connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);
/// Read/write timeout applied to each exchange once connected
pub const DEFAULT_READ_WRITE_TIMEOUT: Duration = Duration::from_secs(60);

// Connection pooling
/// Distinct timeout pairs a `ReqwestTransport` keeps a pooled client for;
/// exchanges with any further pair get a client of their own
pub const MAX_CACHED_CLIENTS: usize = 16;

/// Default User-Agent string for requests built by the free functions.
pub const DEFAULT_USER_AGENT: &str = concat!("requests/", env!("CARGO_PKG_VERSION"));

/// Default User-Agent string for requests issued through a `Session`.
pub const DEFAULT_SESSION_USER_AGENT: &str =
    concat!("requests-session/", env!("CARGO_PKG_VERSION"));

/// Default `Accept` header value.
pub const DEFAULT_ACCEPT: &str = "*/*";

/// Content type used by `post_form`.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Scheme assigned to URLs given without one.
pub const DEFAULT_SCHEME: &str = "http";
