//! The transport seam: one request in, one response out.
//!
//! A [`Transport`] performs exactly one HTTP exchange. It never follows
//! redirects, never touches cookies and never retries; all of that belongs to
//! the client. A non-2xx status is a successful exchange; only failures to get
//! a response at all (DNS, connect, timeout, I/O) are errors.

mod reqwest_transport;

use std::fmt;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};
use futures::Stream;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use crate::config::Timeouts;
use crate::error_handling::TransportError;
use crate::request::PreparedRequest;

pub use reqwest_transport::ReqwestTransport;

/// Performs a single HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response head with an unread body.
    ///
    /// Implementations must not change the request URL's scheme or host and
    /// must apply both timeouts to this exchange.
    async fn exchange(
        &self,
        request: PreparedRequest,
        timeouts: Timeouts,
    ) -> Result<RawResponse, TransportError>;
}

/// A response as returned by a transport: status, headers and an unread body.
#[derive(Debug)]
pub struct RawResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// URL the response came from
    pub url: Url,
    /// Unread body
    pub body: RawBody,
}

/// An unread response body, consumed at most once.
pub struct RawBody {
    stream: BoxStream<'static, Result<Bytes, TransportError>>,
}

impl RawBody {
    /// A body with no content.
    pub fn empty() -> Self {
        Self::from_stream(stream::empty())
    }

    /// Wraps a stream of chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, TransportError>> + Send + 'static,
    {
        Self {
            stream: stream.boxed(),
        }
    }

    /// Reads the next chunk; `None` once the body is exhausted.
    ///
    /// Cancel safe: a chunk is never lost if the future is dropped.
    pub async fn next_chunk(&mut self) -> Option<Result<Bytes, TransportError>> {
        self.stream.next().await
    }

    /// Reads the whole body.
    pub async fn collect(mut self) -> Result<Bytes, TransportError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.next_chunk().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl From<Bytes> for RawBody {
    fn from(bytes: Bytes) -> Self {
        Self::from_stream(stream::once(async move { Ok(bytes) }))
    }
}

impl From<&'static str> for RawBody {
    fn from(s: &'static str) -> Self {
        Self::from(Bytes::from_static(s.as_bytes()))
    }
}

impl fmt::Debug for RawBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawBody")
    }
}
