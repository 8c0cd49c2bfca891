//! The client: transport, cookie jar, redirect policy and the redirect loop.
//!
//! A [`Client`] is cheap to clone. Transport and jar are shared, policy is
//! held by value, so a request that changes its own redirect or timeout
//! settings never affects any other request.
//!
//! The via chain and the redirect history live on the stack of a single
//! [`execute`](Client::execute) call; nothing is remembered between calls
//! except what the cookie jar stores.

mod redirect;

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use percent_encoding::percent_decode_str;
use reqwest::header::{AUTHORIZATION, LOCATION};
use url::Url;

use crate::config::{ClientConfig, RedirectEligibility, Timeouts};
use crate::cookie::CookieJar;
use crate::error_handling::{operation_tag, Error, Result, TransportError};
use crate::request::{Body, PreparedRequest, Request};
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport};

use redirect::{is_redirect_eligible, next_request, redirect_headers, MethodClass, NextRequest};

pub use redirect::{Hop, RedirectRefusal};

/// A caller-supplied redirect predicate.
///
/// Called with the URL about to be requested and the via chain so far
/// (oldest first), after the built-in checks have passed.
pub type RedirectCheck =
    dyn Fn(&Url, &[Hop]) -> std::result::Result<(), RedirectRefusal> + Send + Sync;

/// Sends prepared requests and follows redirects.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    jar: Option<Arc<dyn CookieJar>>,
    config: ClientConfig,
    redirect_check: Option<Arc<RedirectCheck>>,
}

impl Client {
    /// A client over a fresh [`ReqwestTransport`], default policy, no jar.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// A client over `transport`, default policy, no jar.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            jar: None,
            config: ClientConfig::default(),
            redirect_check: None,
        }
    }

    /// Replaces the whole policy.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a cookie jar. Cookies from the jar are sent on every
    /// exchange and every `Set-Cookie` received is stored in it.
    pub fn with_jar(mut self, jar: Arc<dyn CookieJar>) -> Self {
        self.jar = Some(jar);
        self
    }

    /// Installs a redirect check, replacing any previous one.
    pub fn with_redirect_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Url, &[Hop]) -> std::result::Result<(), RedirectRefusal> + Send + Sync + 'static,
    {
        self.redirect_check = Some(Arc::new(check));
        self
    }

    /// Current policy.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The attached cookie jar, if any.
    pub fn jar(&self) -> Option<&Arc<dyn CookieJar>> {
        self.jar.as_ref()
    }

    /// The transport every exchange goes through.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Sets the per-exchange timeouts.
    pub fn set_timeouts(&mut self, timeouts: Timeouts) {
        self.config.timeouts = timeouts;
    }

    /// Enables or disables redirect following.
    pub fn set_allow_redirects(&mut self, allow: bool) {
        self.config.allow_redirects = allow;
    }

    /// Sets the via-chain length at which redirects stop.
    pub fn set_redirect_max(&mut self, max: usize) {
        self.config.redirect_max = max;
    }

    /// Selects the redirect status table.
    pub fn set_eligibility(&mut self, eligibility: RedirectEligibility) {
        self.config.eligibility = eligibility;
    }

    /// A request bound to a copy of this client.
    pub fn request(&self, method: impl AsRef<str>, url: impl Into<String>) -> Request {
        Request::new(method, url).with_client(self.clone())
    }

    /// Sends `request`, following redirects according to the policy.
    ///
    /// The returned response is the last one received. Its
    /// [`history`](Response::history) holds the redirect responses that led to
    /// it, oldest first, with their bodies released.
    ///
    /// # Errors
    ///
    /// - `Error::Transport` if any exchange fails
    /// - `Error::MissingLocation` / `Error::InvalidLocation` for a redirect
    ///   that cannot be followed
    /// - `Error::TooManyRedirects` once the via chain reaches `redirect_max`
    /// - `Error::RedirectRefused` if the redirect check refuses with a reason
    ///
    /// A redirect that is not allowed is not an error: the redirect response
    /// is returned with [`redirect_forbidden`](Response::redirect_forbidden) set.
    pub async fn execute(&self, request: PreparedRequest) -> Result<Response> {
        let op = operation_tag(request.method.as_str());
        let class = MethodClass::of(&request.method);
        let mut via: Vec<Hop> = Vec::new();
        let mut history: Vec<Response> = Vec::new();
        let mut request = request;

        loop {
            let hop = Hop {
                method: request.method.clone(),
                url: request.url.clone(),
            };
            let had_body = request.body.is_some();
            let replay = request.body.as_ref().and_then(Body::try_clone);

            let mut response = self
                .send_once(request)
                .await
                .map_err(|source| {
                    debug!("{op} {}: {source}", hop.url);
                    Error::Transport {
                        op: op.clone(),
                        url: hop.url.to_string(),
                        source,
                    }
                })?;
            let status = response.status();

            if !is_redirect_eligible(self.config.eligibility, class, status) {
                response.set_history(history);
                return Ok(response);
            }

            if !self.config.allow_redirects {
                debug!("{op} {}: {status} not followed, redirects disabled", hop.url);
                response.mark_redirect_forbidden();
                response.set_history(history);
                return Ok(response);
            }

            let Some(raw_location) = response.headers().get(LOCATION) else {
                warn!(
                    "Redirect status {} for {} but no Location header",
                    status, hop.url
                );
                return Err(Error::MissingLocation {
                    op,
                    url: hop.url.to_string(),
                    status,
                });
            };
            // Raw bytes: reqwest lets non-ASCII UTF-8 through in header values.
            let invalid = |source: Box<dyn std::error::Error + Send + Sync>| {
                Error::InvalidLocation {
                    op: op.clone(),
                    url: hop.url.to_string(),
                    location: String::from_utf8_lossy(raw_location.as_bytes()).into_owned(),
                    source,
                }
            };
            let location = std::str::from_utf8(raw_location.as_bytes())
                .map_err(|e| invalid(Box::new(e)))?;
            let next_url = hop.url.join(location).map_err(|e| invalid(Box::new(e)))?;

            let (method, body) = match next_request(class, status, &hop, replay, had_body) {
                NextRequest::Send(method, body) => (method, body),
                NextRequest::NotReplayable => {
                    debug!("{op} {}: {status} not followed, body cannot be resent", hop.url);
                    response.set_history(history);
                    return Ok(response);
                }
            };

            via.push(hop);
            if via.len() >= self.config.redirect_max {
                warn!(
                    "{op}: stopped after {} redirects at {next_url}",
                    self.config.redirect_max
                );
                return Err(Error::TooManyRedirects {
                    op,
                    url: next_url.to_string(),
                    max: self.config.redirect_max,
                    hops: via.len(),
                });
            }

            if let Some(check) = &self.redirect_check {
                match check(&next_url, via.as_slice()) {
                    Ok(()) => {}
                    Err(RedirectRefusal::Forbidden) => {
                        debug!("{op} {next_url}: redirect forbidden by check");
                        response.mark_redirect_forbidden();
                        response.set_history(history);
                        return Ok(response);
                    }
                    Err(RedirectRefusal::Other(reason)) => {
                        return Err(Error::RedirectRefused {
                            op,
                            url: next_url.to_string(),
                            reason,
                        });
                    }
                }
            }

            debug!("{op}: {status} redirect to {next_url}");
            response.release_body();
            history.push(response);

            request = PreparedRequest {
                method,
                headers: redirect_headers(&via),
                url: next_url,
                body,
            };
        }
    }

    /// One exchange: jar cookies and basic auth in, `Set-Cookie` out.
    async fn send_once(
        &self,
        mut request: PreparedRequest,
    ) -> std::result::Result<Response, TransportError> {
        let url = request.url.clone();

        if let Some(jar) = &self.jar {
            for cookie in jar.cookies(&url) {
                request.add_cookie(&cookie);
            }
        }
        if !request.headers.contains(AUTHORIZATION.as_str()) {
            if let Some(credentials) = basic_auth(&url) {
                request.headers.set(AUTHORIZATION.as_str(), credentials);
            }
        }

        let raw = self
            .transport
            .exchange(request, self.config.timeouts)
            .await?;
        let response = Response::from(raw);

        if let Some(jar) = &self.jar {
            if !response.cookies().is_empty() {
                jar.set_cookies(&url, response.cookies().to_vec());
            }
        }
        Ok(response)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("jar", &self.jar.is_some())
            .field("redirect_check", &self.redirect_check.is_some())
            .finish()
    }
}

/// `Basic` credentials from the URL's userinfo, if it has any.
fn basic_auth(url: &Url) -> Option<String> {
    if url.username().is_empty() && url.password().is_none() {
        return None;
    }
    let user = percent_decode_str(url.username()).decode_utf8_lossy();
    let pass = url
        .password()
        .map(|p| percent_decode_str(p).decode_utf8_lossy())
        .unwrap_or_default();
    Some(format!("Basic {}", STANDARD.encode(format!("{user}:{pass}"))))
}
