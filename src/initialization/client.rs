//! Transport and client initialization.
//!
//! The free functions and `Session::new` build their `reqwest` client lazily,
//! on the first exchange. These functions build it eagerly so that a TLS or
//! configuration problem is reported at startup instead of on the first
//! request.

use std::sync::Arc;

use crate::client::Client;
use crate::config::{ClientConfig, SessionConfig};
use crate::error_handling::InitializationError;
use crate::session::Session;
use crate::transport::ReqwestTransport;

/// Initializes a `reqwest` transport for the timeouts in `config`.
///
/// The underlying `reqwest::Client` is created with:
/// - Redirect following disabled (the client runs its own redirect loop)
/// - The connect timeout from `config`
/// - Rustls TLS backend (no native TLS)
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_transport(config: &ClientConfig) -> Result<Arc<ReqwestTransport>, InitializationError> {
    let transport = ReqwestTransport::new();
    transport.client_for(config.timeouts)?;
    Ok(Arc::new(transport))
}

/// Initializes a [`Client`] with `config` over an eagerly built transport.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: ClientConfig) -> Result<Client, InitializationError> {
    let transport = init_transport(&config)?;
    Ok(Client::with_transport(transport).with_config(config))
}

/// Initializes a [`Session`] with `config` over an eagerly built transport.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_session(config: SessionConfig) -> Result<Session, InitializationError> {
    let transport = init_transport(&config.client)?;
    Ok(Session::with_transport(transport, config))
}
