//! Error type definitions.
//!
//! This module defines all error types surfaced by the library.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use reqwest::StatusCode;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP transport.
    #[error("HTTP transport initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Categories of transport-level failure.
///
/// A non-2xx status is never a transport failure; these only describe
/// exchanges that produced no usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum TransportErrorKind {
    /// The request could not be built for the wire
    Builder,
    /// DNS resolution or TCP/TLS connection failed
    Connect,
    /// Connect or read/write timeout elapsed
    Timeout,
    /// The request failed while being sent
    Request,
    /// The response body could not be read
    Body,
    /// The response could not be decoded
    Decode,
    /// Anything else
    Other,
}

impl TransportErrorKind {
    /// Human-readable label for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Builder => "HTTP request builder error",
            TransportErrorKind::Connect => "HTTP request connect error",
            TransportErrorKind::Timeout => "HTTP request timeout error",
            TransportErrorKind::Request => "HTTP request error",
            TransportErrorKind::Body => "HTTP request body error",
            TransportErrorKind::Decode => "HTTP request decode error",
            TransportErrorKind::Other => "HTTP request other error",
        }
    }
}

/// A failed exchange, as reported by a `Transport`.
#[derive(Error, Debug)]
#[error("{}: {message}", kind.as_str())]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TransportError {
    /// Creates a transport error without an underlying cause.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error wrapping an underlying cause.
    pub fn with_source<E>(kind: TransportErrorKind, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// The failure category.
    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// True for connect and read/write timeouts.
    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }

    /// True for DNS and connection failures.
    pub fn is_connect(&self) -> bool {
        self.kind == TransportErrorKind::Connect
    }
}

/// Errors returned by request finalization, the redirect loop and body access.
///
/// Errors raised inside the redirect loop carry an operation tag (the
/// original method in title case, e.g. `Get`) and the URL being attempted.
/// A refused redirect is not an error: see `Response::redirect_forbidden`.
#[derive(Error, Debug)]
pub enum Error {
    /// The raw URL does not parse.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        /// The raw URL as given
        url: String,
        /// Parser failure
        #[source]
        source: url::ParseError,
    },

    /// The method is not a valid HTTP token.
    #[error("invalid HTTP method {0:?}")]
    InvalidMethod(String),

    /// A header name or value cannot be sent on the wire.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader {
        /// Header name
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// A redirect-eligible response arrived without a `Location` header.
    #[error("{op} {url}: {status} response missing Location header")]
    MissingLocation {
        /// Operation tag
        op: String,
        /// URL that produced the response
        url: String,
        /// Status of the response
        status: StatusCode,
    },

    /// The `Location` header is not UTF-8 or cannot be resolved against the
    /// current URL.
    #[error("{op} {url}: invalid Location {location:?}: {source}")]
    InvalidLocation {
        /// Operation tag
        op: String,
        /// URL that produced the response
        url: String,
        /// Header value, lossily decoded
        location: String,
        /// UTF-8 or URL parser failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The via chain reached the configured maximum.
    #[error("{op} {url}: stopped after {max} redirects")]
    TooManyRedirects {
        /// Operation tag
        op: String,
        /// URL that would have been requested next
        url: String,
        /// Configured maximum
        max: usize,
        /// Via chain length reached
        hops: usize,
    },

    /// A caller-installed redirect check refused the redirect.
    #[error("{op} {url}: redirect refused: {reason}")]
    RedirectRefused {
        /// Operation tag
        op: String,
        /// URL that would have been requested next
        url: String,
        /// Reason given by the check
        reason: String,
    },

    /// The exchange failed at the transport level.
    #[error("{op} {url}: {source}")]
    Transport {
        /// Operation tag
        op: String,
        /// URL being requested
        url: String,
        /// Transport failure
        #[source]
        source: TransportError,
    },

    /// Reading the response body failed.
    #[error("failed to read response body: {0}")]
    Body(#[source] TransportError),

    /// The response body is not valid JSON for the target type.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response body is not valid XML for the target type.
    #[error("XML decode error: {0}")]
    Xml(#[from] quick_xml::DeError),
}

impl Error {
    /// The URL attached to the error, when there is one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::InvalidUrl { url, .. }
            | Error::MissingLocation { url, .. }
            | Error::InvalidLocation { url, .. }
            | Error::TooManyRedirects { url, .. }
            | Error::RedirectRefused { url, .. }
            | Error::Transport { url, .. } => Some(url),
            _ => None,
        }
    }

    /// The status code attached to the error, when there is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::MissingLocation { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True if the redirect chain exceeded its limit.
    pub fn is_too_many_redirects(&self) -> bool {
        matches!(self, Error::TooManyRedirects { .. })
    }

    /// True if the error came from the transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
