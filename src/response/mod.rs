//! Responses.
//!
//! A [`Response`] wraps one completed exchange. The body is read lazily,
//! exactly once, and cached: every later call to [`content`](Response::content),
//! [`text`](Response::text) or the decoders sees the same bytes.

use bytes::{Bytes, BytesMut};
use reqwest::header::{HeaderMap, LOCATION, SET_COOKIE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::cookie::Cookie;
use crate::error_handling::{Error, Result, TransportError, TransportErrorKind};
use crate::transport::{RawBody, RawResponse};

enum BodyState {
    /// Not fully read yet; `buf` holds the chunks received so far
    Reading { raw: RawBody, buf: BytesMut },
    Cached(Bytes),
    Failed,
}

/// An HTTP response.
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: BodyState,
    cookies: Vec<Cookie>,
    redirect_forbidden: bool,
    history: Vec<Response>,
}

impl Response {
    /// Status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of header `name`, if it is valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// URL that produced this response.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The `Location` header resolved against [`url`](Response::url).
    pub fn location(&self) -> Option<Url> {
        let raw = self.headers.get(LOCATION)?;
        let location = std::str::from_utf8(raw.as_bytes()).ok()?;
        self.url.join(location).ok()
    }

    /// True for 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// True for 3xx.
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// True for 4xx.
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// True for 5xx.
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// True if this redirect response was returned because following it was
    /// not allowed. This is not an error; the status is the redirect's own.
    pub fn redirect_forbidden(&self) -> bool {
        self.redirect_forbidden
    }

    /// Intermediate redirect responses received before this one, oldest
    /// first. Their bodies have been released.
    pub fn history(&self) -> &[Response] {
        &self.history
    }

    /// Takes the redirect history out of this response.
    pub fn into_history(self) -> Vec<Response> {
        self.history
    }

    /// Every cookie from the `Set-Cookie` headers, in header order.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// The named cookie; when a name repeats, the last occurrence wins.
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().rev().find(|c| c.name == name)
    }

    /// The body bytes, read from the transport on first call and cached.
    ///
    /// # Errors
    ///
    /// Returns `Error::Body` if reading fails. A body that failed to read is
    /// not read again; later calls fail too.
    ///
    /// Dropping the future mid-read is not a failure: the chunks already
    /// received are kept and the next call carries on from there.
    pub async fn content(&mut self) -> Result<Bytes> {
        loop {
            match &mut self.body {
                BodyState::Cached(bytes) => return Ok(bytes.clone()),
                BodyState::Failed => {
                    return Err(Error::Body(TransportError::new(
                        TransportErrorKind::Body,
                        "response body already failed to read",
                    )))
                }
                BodyState::Reading { raw, buf } => match raw.next_chunk().await {
                    Some(Ok(chunk)) => buf.extend_from_slice(&chunk),
                    Some(Err(e)) => {
                        self.body = BodyState::Failed;
                        return Err(Error::Body(e));
                    }
                    None => {
                        let bytes = std::mem::take(buf).freeze();
                        self.body = BodyState::Cached(bytes.clone());
                        return Ok(bytes);
                    }
                },
            }
        }
    }

    /// The body as text; invalid UTF-8 is replaced.
    pub async fn text(&mut self) -> Result<String> {
        let bytes = self.content().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Decodes the body as JSON.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.content().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Decodes the body as XML.
    pub async fn xml<T: DeserializeOwned>(&mut self) -> Result<T> {
        let text = self.text().await?;
        Ok(quick_xml::de::from_str(&text)?)
    }

    pub(crate) fn mark_redirect_forbidden(&mut self) {
        self.redirect_forbidden = true;
    }

    pub(crate) fn set_history(&mut self, history: Vec<Response>) {
        self.history = history;
    }

    /// Drops the unread body, releasing the underlying connection.
    pub(crate) fn release_body(&mut self) {
        if let BodyState::Reading { .. } = self.body {
            self.body = BodyState::Cached(Bytes::new());
        }
    }
}

impl From<RawResponse> for Response {
    fn from(raw: RawResponse) -> Self {
        let cookies = raw
            .headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(Cookie::parse_set_cookie)
            .collect();
        Self {
            status: raw.status,
            headers: raw.headers,
            url: raw.url,
            body: BodyState::Reading {
                raw: raw.body,
                buf: BytesMut::new(),
            },
            cookies,
            redirect_forbidden: false,
            history: Vec::new(),
        }
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .field("redirect_forbidden", &self.redirect_forbidden)
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
