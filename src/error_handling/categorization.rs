//! Error categorization.
//!
//! This module maps `reqwest` failures onto transport error categories and
//! builds the operation tag used to label errors.

use super::types::{TransportError, TransportErrorKind};

/// Categorizes a `reqwest::Error` into a `TransportErrorKind`.
///
/// Redirect errors cannot occur because the transport never lets `reqwest`
/// follow redirects; should one appear it is reported as `Other`.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
///
/// # Returns
///
/// The appropriate `TransportErrorKind` for the error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> TransportErrorKind {
    if error.is_builder() {
        TransportErrorKind::Builder
    } else if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else if error.is_request() {
        TransportErrorKind::Request
    } else if error.is_body() {
        TransportErrorKind::Body
    } else if error.is_decode() {
        TransportErrorKind::Decode
    } else {
        TransportErrorKind::Other
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = categorize_reqwest_error(&error);
        TransportError::with_source(kind, error)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(error: std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::TimedOut => TransportErrorKind::Timeout,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected => TransportErrorKind::Connect,
            _ => TransportErrorKind::Body,
        };
        TransportError::with_source(kind, error)
    }
}

/// Builds the operation tag for a method: first letter kept, rest lowercased.
///
/// `GET` becomes `Get`, `POST` becomes `Post`.
pub fn operation_tag(method: &str) -> String {
    let mut chars = method.chars();
    match chars.next() {
        Some(first) => {
            let mut tag = String::with_capacity(method.len());
            tag.push(first);
            tag.push_str(&chars.as_str().to_lowercase());
            tag
        }
        None => String::new(),
    }
}
