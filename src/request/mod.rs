//! Request building and finalization.
//!
//! A [`Request`] is a mutable builder for the method, URL, query parameters,
//! headers, cookies and body of one logical call. Finalizing it
//! ([`Request::prepare`]) parses the raw URL, merges the query parameters into
//! it and defaults the scheme to `http`. [`Request::send`] finalizes, then
//! hands the wire-ready [`PreparedRequest`] to the request's [`Client`].
//!
//! Every request owns a [`Client`] from construction. Redirect and timeout
//! settings made on a request change that request's client only; the
//! transport and cookie jar behind it stay shared.

mod body;

use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use tokio::io::AsyncRead;
use url::Url;

use crate::client::Client;
use crate::config::{Timeouts, DEFAULT_SCHEME};
use crate::cookie::Cookie;
use crate::error_handling::{Error, Result};
use crate::multimap::MultiMap;
use crate::response::Response;

pub use body::Body;

/// A finalized, wire-ready request: absolute URL, populated headers, optional body.
#[derive(Debug)]
pub struct PreparedRequest {
    /// Request method
    pub method: Method,
    /// Absolute URL, query included
    pub url: Url,
    /// Request headers (case-insensitive keys)
    pub headers: MultiMap,
    /// Optional body
    pub body: Option<Body>,
}

impl PreparedRequest {
    /// Creates a request with no headers and no body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: MultiMap::case_insensitive(),
            body: None,
        }
    }

    /// Appends a cookie to the single `Cookie` header.
    pub fn add_cookie(&mut self, cookie: &Cookie) {
        append_cookie(&mut self.headers, cookie);
    }

    /// Body length, when known.
    pub fn content_length(&self) -> Option<u64> {
        self.body.as_ref().and_then(Body::len)
    }
}

/// A configured-but-unsent HTTP request.
///
/// # Example
///
/// ```
/// use requests::Request;
///
/// let mut req = Request::new("GET", "http://a.b?k=v")
///     .add_param("k1", "v1")
///     .add_param("k1", "v11");
/// let url = req.prepare().unwrap();
/// assert_eq!(url.query(), Some("k=v&k1=v1&k1=v11"));
/// ```
#[derive(Debug)]
pub struct Request {
    method: String,
    raw_url: String,
    url: Option<Url>,
    params: MultiMap,
    headers: MultiMap,
    body: Option<Body>,
    client: Client,
}

impl Request {
    /// Creates a request bound to a default [`Client`].
    ///
    /// The method is uppercased. The URL is not validated until
    /// [`prepare`](Request::prepare); if it already parses, its query
    /// parameters seed the parameter map.
    pub fn new(method: impl AsRef<str>, url: impl Into<String>) -> Self {
        let raw_url = url.into();
        let params = parse_with_default_scheme(&raw_url)
            .ok()
            .and_then(|u| u.query().map(MultiMap::from_query))
            .unwrap_or_default();
        Self {
            method: method.as_ref().to_ascii_uppercase(),
            raw_url,
            url: None,
            params,
            headers: MultiMap::case_insensitive(),
            body: None,
            client: Client::new(),
        }
    }

    /// Binds the request to `client`.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// The client that will send this request.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Uppercased method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The URL exactly as given.
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    // Headers

    /// First value of header `key` (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// All headers.
    pub fn headers(&self) -> &MultiMap {
        &self.headers
    }

    /// Replaces all values of header `key`.
    pub fn set_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(key, value);
        self
    }

    /// Appends a value to header `key`.
    pub fn add_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(key, value);
        self
    }

    /// Removes header `key`. Absent keys are ignored.
    pub fn del_header(mut self, key: &str) -> Self {
        self.headers.delete(key);
        self
    }

    // Query parameters

    /// First value of query parameter `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// All query parameters, including those taken from the raw URL.
    pub fn params(&self) -> &MultiMap {
        &self.params
    }

    /// Replaces all values of parameter `key`.
    pub fn set_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(key, value);
        self
    }

    /// Appends a value to parameter `key`.
    pub fn add_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.add(key, value);
        self
    }

    /// Removes parameter `key`. Absent keys are ignored.
    pub fn del_param(mut self, key: &str) -> Self {
        self.params.delete(key);
        self
    }

    // Cookies

    /// Cookies currently carried by the `Cookie` header.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.headers
            .get_all(COOKIE.as_str())
            .iter()
            .flat_map(|h| Cookie::parse_cookie_header(h))
            .collect()
    }

    /// The named cookie from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<Cookie> {
        self.cookies().into_iter().find(|c| c.name == name)
    }

    /// Adds a cookie. All cookies share one `Cookie` header, separated by `; `.
    pub fn add_cookie(mut self, cookie: &Cookie) -> Self {
        append_cookie(&mut self.headers, cookie);
        self
    }

    // Client policy

    /// Sets the connect and read/write timeouts of this request's client.
    pub fn timeout(mut self, connect: Duration, read_write: Duration) -> Self {
        self.client.set_timeouts(Timeouts::new(connect, read_write));
        self
    }

    /// Enables or disables redirect following for this request.
    pub fn allow_redirects(mut self, allow: bool) -> Self {
        self.client.set_allow_redirects(allow);
        self
    }

    /// Sets the maximum redirect chain length for this request.
    pub fn redirect_max(mut self, max: usize) -> Self {
        self.client.set_redirect_max(max);
        self
    }

    // Body

    /// Sets a buffered body and its `Content-Type`.
    pub fn body(mut self, data: impl Into<Body>, content_type: &str) -> Self {
        self.body = Some(data.into());
        self.headers.set(CONTENT_TYPE.as_str(), content_type);
        self
    }

    /// Sets a streamed body and its `Content-Type`. The length is unknown.
    pub fn body_reader<R>(mut self, reader: R, content_type: &str) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        self.body = Some(Body::from_reader(reader));
        self.headers.set(CONTENT_TYPE.as_str(), content_type);
        self
    }

    /// The body, if one is set.
    pub fn body_ref(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Body length, when known.
    pub fn content_length(&self) -> Option<u64> {
        self.body.as_ref().and_then(Body::len)
    }

    // Finalization

    /// Computes the finalized URL without storing it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the raw URL does not parse.
    pub fn prepared_url(&self) -> Result<Url> {
        let mut url = parse_with_default_scheme(&self.raw_url)?;
        if self.params.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.params.to_query()));
        }
        Ok(url)
    }

    /// Finalizes the URL: parses the raw URL, writes the parameter map into
    /// its query and defaults a missing scheme to `http`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the raw URL does not parse.
    pub fn prepare(&mut self) -> Result<&Url> {
        let url = self.prepared_url()?;
        Ok(self.url.insert(url))
    }

    /// The URL from the last successful [`prepare`](Request::prepare).
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The query of the last prepared URL, parsed back into a multimap.
    pub fn query(&self) -> MultiMap {
        self.url
            .as_ref()
            .and_then(Url::query)
            .map(MultiMap::from_query)
            .unwrap_or_default()
    }

    /// Finalizes the request and splits it into its wire form and its client.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl`, `Error::InvalidMethod` or
    /// `Error::InvalidHeader` when the request cannot be put on the wire.
    pub fn into_prepared(mut self) -> Result<(PreparedRequest, Client)> {
        let url = self.prepare()?.clone();
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| Error::InvalidMethod(self.method.clone()))?;
        for (name, value) in self.headers.iter() {
            validate_header(name, value)?;
        }
        let prepared = PreparedRequest {
            method,
            url,
            headers: self.headers,
            body: self.body,
        };
        Ok((prepared, self.client))
    }

    /// Finalizes the request and sends it through its client, following
    /// redirects according to the client's policy.
    ///
    /// This is the only operation that performs network I/O.
    pub async fn send(self) -> Result<Response> {
        let (prepared, client) = self.into_prepared()?;
        client.execute(prepared).await
    }
}

/// Parses `raw`, retrying with an `http://` prefix when no scheme is present.
fn parse_with_default_scheme(raw: &str) -> Result<Url> {
    let invalid = |source| Error::InvalidUrl {
        url: raw.to_string(),
        source,
    };
    match Url::parse(raw) {
        // `host:port/path` parses as an opaque URL with scheme `host`
        Ok(url) if url.cannot_be_a_base() => {
            Url::parse(&format!("{DEFAULT_SCHEME}://{raw}")).map_err(invalid)
        }
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("{DEFAULT_SCHEME}://{raw}")).map_err(invalid)
        }
        Err(source) => Err(invalid(source)),
    }
}

fn validate_header(name: &str, value: &str) -> Result<()> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn append_cookie(headers: &mut MultiMap, cookie: &Cookie) {
    let value = match headers.get(COOKIE.as_str()) {
        Some(existing) if !existing.is_empty() => format!("{existing}; {cookie}"),
        _ => cookie.to_string(),
    };
    headers.set(COOKIE.as_str(), value);
}
