//! Cookies and cookie jars.
//!
//! [`Cookie`] is the structured form of a `Set-Cookie` header (or one pair of a
//! `Cookie` header). Parsing follows the common subset of RFC 6265: `Path`,
//! `Domain` (leading dot stripped), `Expires`, `Max-Age`, `Secure`,
//! `HttpOnly` and `SameSite` are recognized; unknown attributes are ignored.
//!
//! [`CookieJar`] is the store a client consults before every exchange and
//! updates after it. [`MemoryCookieJar`] is the in-memory implementation.

mod jar;

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

pub use jar::{CookieJar, MemoryCookieJar};

/// A single HTTP cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value, surrounding quotes removed
    pub value: String,
    /// `Domain` attribute, without a leading dot
    pub domain: Option<String>,
    /// `Path` attribute
    pub path: Option<String>,
    /// `Expires` attribute
    pub expires: Option<DateTime<Utc>>,
    /// `Max-Age` attribute in seconds
    pub max_age: Option<i64>,
    /// `Secure` flag
    pub secure: bool,
    /// `HttpOnly` flag
    pub http_only: bool,
    /// `SameSite` attribute, normalized to `Strict`, `Lax` or `None` when recognized
    pub same_site: Option<String>,
}

impl Cookie {
    /// Creates a cookie with only a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            expires: None,
            max_age: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// Parses a `Set-Cookie` header value.
    ///
    /// Returns `None` when the header has no `name=value` pair or an empty name.
    pub fn parse_set_cookie(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie::new(name, unquote(value.trim()));

        for part in parts {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once('=') {
                Some((k, v)) => {
                    let v = v.trim();
                    match k.trim().to_ascii_lowercase().as_str() {
                        "path" => cookie.path = Some(v.to_string()),
                        "domain" => {
                            let domain = v.trim_start_matches('.').to_ascii_lowercase();
                            if !domain.is_empty() {
                                cookie.domain = Some(domain);
                            }
                        }
                        "expires" => cookie.expires = parse_http_date(v),
                        "max-age" => cookie.max_age = v.parse().ok(),
                        "samesite" => {
                            let normalized = if v.eq_ignore_ascii_case("lax") {
                                "Lax"
                            } else if v.eq_ignore_ascii_case("strict") {
                                "Strict"
                            } else if v.eq_ignore_ascii_case("none") {
                                "None"
                            } else {
                                v
                            };
                            cookie.same_site = Some(normalized.to_string());
                        }
                        _ => {}
                    }
                }
                None => {
                    if part.eq_ignore_ascii_case("secure") {
                        cookie.secure = true;
                    } else if part.eq_ignore_ascii_case("httponly") {
                        cookie.http_only = true;
                    }
                }
            }
        }

        Some(cookie)
    }

    /// Parses a `Cookie` request header (`a=1; b=2`) into name/value cookies.
    ///
    /// Malformed pairs are skipped.
    pub fn parse_cookie_header(header: &str) -> Vec<Self> {
        header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                let name = name.trim();
                if name.is_empty() {
                    None
                } else {
                    Some(Cookie::new(name, unquote(value.trim())))
                }
            })
            .collect()
    }

    /// True if the cookie has expired at `now`.
    ///
    /// `Max-Age` takes precedence over `Expires`; a non-positive `Max-Age`
    /// means the cookie is expired immediately.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (self.max_age, self.expires) {
            (Some(max_age), _) => max_age <= 0,
            (None, Some(expires)) => expires <= now,
            (None, None) => false,
        }
    }
}

/// Formats the cookie as the `name=value` pair sent in a `Cookie` header.
impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parses an HTTP date (`Wed, 21 Oct 2015 07:28:00 GMT`), also accepting the
/// dashed `Wed, 21-Oct-2015 07:28:00 GMT` form common in cookies.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}
