//! `reqwest`-backed transport.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use futures::TryStreamExt;
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::ClientBuilder;

use super::{RawBody, RawResponse, Transport};
use crate::config::{Timeouts, MAX_CACHED_CLIENTS};
use crate::error_handling::{TransportError, TransportErrorKind};
use crate::request::PreparedRequest;

/// Transport built on `reqwest`.
///
/// The underlying clients are created with:
/// - Redirect following disabled (the library runs its own redirect loop)
/// - No cookie store (cookies are handled by the client's jar)
/// - Rustls TLS backend (no native TLS)
/// - The connect timeout of the exchange
///
/// The read/write timeout is applied per request, on top of the connect
/// timeout. One `reqwest::Client` (and its connection pool) is kept per
/// distinct timeout pair, for at most [`MAX_CACHED_CLIENTS`] pairs. Beyond
/// that, each exchange builds an unpooled client.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    clients: Mutex<HashMap<Timeouts, reqwest::Client>>,
}

impl ReqwestTransport {
    /// Creates a transport; clients are built on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds (or reuses) the client for `timeouts`.
    ///
    /// # Errors
    ///
    /// Returns a `reqwest::Error` if client creation fails.
    pub fn client_for(&self, timeouts: Timeouts) -> Result<reqwest::Client, reqwest::Error> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(&timeouts) {
            return Ok(client.clone());
        }
        let client = ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(timeouts.connect)
            .build()?;
        if clients.len() < MAX_CACHED_CLIENTS {
            clients.insert(timeouts, client.clone());
        } else {
            debug!("client cache full, {timeouts:?} gets an unpooled client");
        }
        Ok(client)
    }

    /// Number of pooled clients currently kept.
    pub fn cached_clients(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn exchange(
        &self,
        request: PreparedRequest,
        timeouts: Timeouts,
    ) -> Result<RawResponse, TransportError> {
        let client = self.client_for(timeouts)?;

        let mut headers = HeaderMap::new();
        for (name, value) in request.headers.iter() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::with_source(TransportErrorKind::Builder, e))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::with_source(TransportErrorKind::Builder, e))?;
            headers.append(name, value);
        }

        debug!("{} {}", request.method, request.url);
        let mut builder = client
            .request(request.method, request.url)
            .headers(headers)
            .timeout(timeouts.connect + timeouts.read_write);
        if let Some(body) = request.body {
            builder = builder.body(body.into_reqwest());
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let url = resp.url().clone();
        let body = RawBody::from_stream(resp.bytes_stream().map_err(TransportError::from));

        Ok(RawResponse {
            status,
            headers,
            url,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_client_cache_is_bounded() {
        let transport = ReqwestTransport::new();
        let default = Timeouts::default();
        transport.client_for(default).unwrap();
        transport.client_for(default).unwrap();
        assert_eq!(transport.cached_clients(), 1);

        for ms in 1..=(MAX_CACHED_CLIENTS as u64 * 2) {
            let timeouts = Timeouts {
                connect: Duration::from_millis(ms),
                ..default
            };
            transport.client_for(timeouts).unwrap();
        }
        assert_eq!(transport.cached_clients(), MAX_CACHED_CLIENTS);
    }
}
