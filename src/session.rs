//! Sessions: one client, one cookie jar, default headers.
//!
//! A [`Session`] originates requests bound to its own [`Client`], which
//! carries a [`MemoryCookieJar`] for the session's whole lifetime. Every
//! request is stamped with the session's `User-Agent` before being handed
//! back for further configuration.
//!
//! Clones share the client's transport, the jar and the "last URL" used by
//! [`Session::cookies`].

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::client::Client;
use crate::config::{SessionConfig, DEFAULT_ACCEPT, FORM_CONTENT_TYPE};
use crate::cookie::{Cookie, CookieJar, MemoryCookieJar};
use crate::multimap::MultiMap;
use crate::request::{Body, Request};
use crate::transport::{ReqwestTransport, Transport};

/// A client with a persistent cookie jar and default headers.
#[derive(Clone, Debug)]
pub struct Session {
    client: Client,
    jar: Arc<MemoryCookieJar>,
    user_agent: String,
    last_url: Arc<Mutex<Option<Url>>>,
}

impl Session {
    /// A session over a fresh [`ReqwestTransport`] with default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// A session over a fresh [`ReqwestTransport`].
    pub fn with_config(config: SessionConfig) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()), config)
    }

    /// A session whose client sends through `transport`.
    pub fn with_transport(transport: Arc<dyn Transport>, config: SessionConfig) -> Self {
        let jar = Arc::new(MemoryCookieJar::new());
        let client = Client::with_transport(transport)
            .with_config(config.client)
            .with_jar(jar.clone());
        Self {
            client,
            jar,
            user_agent: config.user_agent,
            last_url: Arc::new(Mutex::new(None)),
        }
    }

    /// The `User-Agent` stamped on new requests.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Changes the `User-Agent` for requests created from now on.
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
    }

    /// The session's client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The session's client, for changing its policy. Requests already
    /// created keep the policy they were created with.
    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// The session's cookie jar.
    pub fn jar(&self) -> &Arc<MemoryCookieJar> {
        &self.jar
    }

    /// A request bound to this session's client, with default headers set.
    ///
    /// Its URL becomes the session's last URL if it parses.
    pub fn request(&self, method: impl AsRef<str>, url: impl Into<String>) -> Request {
        let request = self
            .client
            .request(method, url)
            .set_header(USER_AGENT.as_str(), self.user_agent.as_str())
            .set_header(ACCEPT.as_str(), DEFAULT_ACCEPT);
        if let Ok(url) = request.prepared_url() {
            *self.last_url.lock().unwrap_or_else(PoisonError::into_inner) = Some(url);
        }
        request
    }

    /// `GET url`
    pub fn get(&self, url: impl Into<String>) -> Request {
        self.request("GET", url)
    }

    /// `POST url` with a body of type `content_type`.
    pub fn post(
        &self,
        url: impl Into<String>,
        body: impl Into<Body>,
        content_type: &str,
    ) -> Request {
        self.request("POST", url).body(body, content_type)
    }

    /// `POST url` with `form` encoded as `application/x-www-form-urlencoded`.
    pub fn post_form(&self, url: impl Into<String>, form: &MultiMap) -> Request {
        self.post(url, form.to_query(), FORM_CONTENT_TYPE)
    }

    /// `PUT url` with a body of type `content_type`.
    pub fn put(
        &self,
        url: impl Into<String>,
        body: impl Into<Body>,
        content_type: &str,
    ) -> Request {
        self.request("PUT", url).body(body, content_type)
    }

    /// `HEAD url`
    pub fn head(&self, url: impl Into<String>) -> Request {
        self.request("HEAD", url)
    }

    /// `OPTIONS url`
    pub fn options(&self, url: impl Into<String>) -> Request {
        self.request("OPTIONS", url)
    }

    /// `PATCH url` with a body of type `content_type`.
    pub fn patch(
        &self,
        url: impl Into<String>,
        body: impl Into<Body>,
        content_type: &str,
    ) -> Request {
        self.request("PATCH", url).body(body, content_type)
    }

    /// `DELETE url`
    pub fn delete(&self, url: impl Into<String>) -> Request {
        self.request("DELETE", url)
    }

    /// URL of the most recently created request, if any.
    pub fn last_url(&self) -> Option<Url> {
        self.last_url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cookies the jar would send to `url`, or to the last URL when `url`
    /// is `None`. Empty when there is neither.
    pub fn cookies(&self, url: Option<&Url>) -> Vec<Cookie> {
        match url {
            Some(url) => self.jar.cookies(url),
            None => match self.last_url() {
                Some(last) => self.jar.cookies(&last),
                None => Vec::new(),
            },
        }
    }

    /// The named cookie from [`cookies`](Session::cookies).
    pub fn cookie(&self, name: &str, url: Option<&Url>) -> Option<Cookie> {
        self.cookies(url).into_iter().find(|c| c.name == name)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
