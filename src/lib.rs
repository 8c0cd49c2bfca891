//! requests: an HTTP convenience layer with an explicit redirect loop
//!
//! This library builds requests, sends them through a pluggable transport and
//! follows redirects itself, so that every hop is visible: which statuses are
//! followed for which methods, how the next request is derived, when a chain
//! is cut off, and which intermediate responses were received.
//!
//! # Example
//!
//! ```no_run
//! use requests::Session;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new();
//! let mut resp = session
//!     .get("http://example.com/login")
//!     .add_param("next", "/home")
//!     .send()
//!     .await?;
//!
//! println!("{} after {} redirects", resp.status(), resp.history().len());
//! println!("{}", resp.text().await?);
//! println!("{:?}", session.cookie("sid", None));
//! # Ok(())
//! # }
//! ```
//!
//! Redirects can be turned off per request. The first redirect response is
//! then returned as is, marked rather than failed:
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resp = requests::get("http://example.com/old")
//!     .allow_redirects(false)
//!     .send()
//!     .await?;
//! assert!(resp.redirect_forbidden());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod api;
pub mod client;
pub mod config;
pub mod cookie;
mod error_handling;
pub mod initialization;
mod multimap;
pub mod request;
pub mod response;
mod session;
pub mod transport;

// Re-export public API
pub use api::{delete, get, head, options, patch, post, post_form, put, request, request_with};
pub use client::{Client, Hop, RedirectCheck, RedirectRefusal};
pub use config::{
    ClientConfig, LogFormat, LogLevel, RedirectEligibility, RequestDefaults, SessionConfig,
    Timeouts,
};
pub use cookie::{Cookie, CookieJar, MemoryCookieJar};
pub use error_handling::{
    categorize_reqwest_error, operation_tag, Error, InitializationError, Result, TransportError,
    TransportErrorKind,
};
pub use multimap::MultiMap;
pub use request::{Body, PreparedRequest, Request};
pub use response::Response;
pub use session::Session;
pub use transport::{RawBody, RawResponse, ReqwestTransport, Transport};

/// Query parameters: a case-sensitive [`MultiMap`].
pub type Params = MultiMap;

/// Request headers: build with [`MultiMap::case_insensitive`].
pub type Headers = MultiMap;
