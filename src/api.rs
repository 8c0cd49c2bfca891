//! Free functions for one-off requests.
//!
//! Each function returns a configured-but-unsent [`Request`] bound to a fresh
//! default [`Client`](crate::Client) (no cookie jar), stamped with the
//! default `User-Agent` and `Accept` headers. Nothing touches the network
//! until [`Request::send`].
//!
//! ```no_run
//! # async fn run() -> requests::Result<()> {
//! let mut resp = requests::get("http://example.com/").send().await?;
//! println!("{}", resp.text().await?);
//! # Ok(())
//! # }
//! ```

use reqwest::header::{ACCEPT, USER_AGENT};

use crate::config::{RequestDefaults, FORM_CONTENT_TYPE};
use crate::multimap::MultiMap;
use crate::request::{Body, Request};

/// A request with the default headers.
pub fn request(method: impl AsRef<str>, url: impl Into<String>) -> Request {
    request_with(&RequestDefaults::default(), method, url)
}

/// A request stamped with the headers from `defaults`.
pub fn request_with(
    defaults: &RequestDefaults,
    method: impl AsRef<str>,
    url: impl Into<String>,
) -> Request {
    Request::new(method, url)
        .set_header(USER_AGENT.as_str(), defaults.user_agent.as_str())
        .set_header(ACCEPT.as_str(), defaults.accept.as_str())
}

/// `GET url`
pub fn get(url: impl Into<String>) -> Request {
    request("GET", url)
}

/// `POST url` with a body of type `content_type`.
pub fn post(url: impl Into<String>, body: impl Into<Body>, content_type: &str) -> Request {
    request("POST", url).body(body, content_type)
}

/// `POST url` with `form` encoded as `application/x-www-form-urlencoded`.
pub fn post_form(url: impl Into<String>, form: &MultiMap) -> Request {
    post(url, form.to_query(), FORM_CONTENT_TYPE)
}

/// `PUT url` with a body of type `content_type`.
pub fn put(url: impl Into<String>, body: impl Into<Body>, content_type: &str) -> Request {
    request("PUT", url).body(body, content_type)
}

/// `HEAD url`
pub fn head(url: impl Into<String>) -> Request {
    request("HEAD", url)
}

/// `OPTIONS url`
pub fn options(url: impl Into<String>) -> Request {
    request("OPTIONS", url)
}

/// `PATCH url` with a body of type `content_type`.
pub fn patch(url: impl Into<String>, body: impl Into<Body>, content_type: &str) -> Request {
    request("PATCH", url).body(body, content_type)
}

/// `DELETE url`
pub fn delete(url: impl Into<String>) -> Request {
    request("DELETE", url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ACCEPT, DEFAULT_USER_AGENT};

    #[test]
    fn test_verbs_build_unsent_requests() {
        assert_eq!(get("http://a.test/").method(), "GET");
        assert_eq!(head("http://a.test/").method(), "HEAD");
        assert_eq!(options("http://a.test/").method(), "OPTIONS");
        assert_eq!(delete("http://a.test/").method(), "DELETE");
        assert_eq!(post("http://a.test/", "x", "text/plain").method(), "POST");
        assert_eq!(put("http://a.test/", "x", "text/plain").method(), "PUT");
        assert_eq!(patch("http://a.test/", "x", "text/plain").method(), "PATCH");
    }

    #[test]
    fn test_default_headers_are_stamped() {
        let req = get("http://a.test/");
        assert_eq!(req.header("user-agent"), Some(DEFAULT_USER_AGENT));
        assert_eq!(req.header("accept"), Some(DEFAULT_ACCEPT));
        assert!(req.client().jar().is_none());
    }

    #[test]
    fn test_explicit_defaults() {
        let defaults = RequestDefaults {
            user_agent: "agent/1.0".to_string(),
            accept: "application/json".to_string(),
        };
        let req = request_with(&defaults, "get", "a.test");
        assert_eq!(req.method(), "GET");
        assert_eq!(req.header("User-Agent"), Some("agent/1.0"));
        assert_eq!(req.header("Accept"), Some("application/json"));
    }

    #[test]
    fn test_body_sets_content_type_and_length() {
        let req = put("http://a.test/", "hello", "text/plain");
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.content_length(), Some(5));
    }

    #[test]
    fn test_post_form_encodes_fields() {
        let mut form = MultiMap::new();
        form.add("name", "a b");
        form.add("tag", "x&y");
        form.add("tag", "z");
        let req = post_form("http://a.test/submit", &form);
        assert_eq!(req.header("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(
            req.body_ref().and_then(Body::as_bytes),
            Some(&b"name=a+b&tag=x%26y&tag=z"[..])
        );
    }
}
