//! Cookie jar abstraction and the in-memory implementation.
//!
//! A jar is shared by every exchange of a client (and every request of a
//! session), so implementations take `&self` and synchronize internally.

use std::sync::{PoisonError, RwLock};

use chrono::{Duration, Utc};
use log::debug;
use url::{Host, Url};

use super::Cookie;

/// A store mapping site scope to cookies.
///
/// The client calls [`cookies`](CookieJar::cookies) before each exchange and
/// [`set_cookies`](CookieJar::set_cookies) with the parsed `Set-Cookie`
/// headers after it.
pub trait CookieJar: Send + Sync {
    /// Returns the cookies to send to `url`.
    ///
    /// Callers should treat the result as a set; ordering carries no meaning.
    fn cookies(&self, url: &Url) -> Vec<Cookie>;

    /// Stores cookies received from `url`, overwriting same-named cookies in
    /// the same scope.
    fn set_cookies(&self, url: &Url, cookies: Vec<Cookie>);
}

#[derive(Debug, Clone)]
struct StoredCookie {
    cookie: Cookie,
    /// Scope domain: the `Domain` attribute, or the request host when host-only
    domain: String,
    path: String,
    host_only: bool,
}

/// In-memory cookie jar.
///
/// Cookies are keyed by (domain, path, name). Matching rules:
/// - host-only cookies (no `Domain` attribute) match only the exact host;
/// - `Domain` cookies match that domain and its subdomains, and are refused
///   when the setting host is outside the domain;
/// - a `Domain` naming an IP address or a dotless name (`com`, `localhost`)
///   is only accepted when it equals the setting host, and then scopes the
///   cookie to that host alone;
/// - a missing or relative `Path` defaults to the directory of the request path;
/// - `Secure` cookies are only returned for `https` URLs;
/// - an expired cookie (`Max-Age <= 0` or `Expires` in the past) removes the
///   stored entry and is never returned.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    entries: RwLock<Vec<StoredCookie>>,
}

impl MemoryCookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cookies, expired or not.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if the jar holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every cookie.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl CookieJar for MemoryCookieJar {
    fn cookies(&self, url: &Url) -> Vec<Cookie> {
        let Some(host) = url.host_str() else {
            return Vec::new();
        };
        let host = host.to_ascii_lowercase();
        let is_https = url.scheme() == "https";
        let now = Utc::now();

        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut matched: Vec<&StoredCookie> = entries
            .iter()
            .filter(|stored| {
                let domain_ok = if stored.host_only {
                    host == stored.domain
                } else {
                    domain_match(&host, &stored.domain)
                };
                domain_ok
                    && path_match(url.path(), &stored.path)
                    && (!stored.cookie.secure || is_https)
                    && !stored.cookie.is_expired_at(now)
            })
            .collect();
        // more specific paths first
        matched.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        matched.into_iter().map(|s| s.cookie.clone()).collect()
    }

    fn set_cookies(&self, url: &Url, cookies: Vec<Cookie>) {
        let Some(host) = url.host_str() else {
            return;
        };
        let host = host.to_ascii_lowercase();
        let is_ip = matches!(url.host(), Some(Host::Ipv4(_) | Host::Ipv6(_)));
        let now = Utc::now();

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for mut cookie in cookies {
            let (domain, host_only) = match cookie.domain.take() {
                // An IP host or a dotless domain can only scope the host itself.
                Some(domain) if domain == host && (is_ip || !domain.contains('.')) => {
                    (domain, true)
                }
                Some(domain) if !is_ip && domain.contains('.') && domain_match(&host, &domain) => {
                    (domain, false)
                }
                Some(domain) => {
                    debug!(
                        "Ignoring cookie {} for domain {} set by {}",
                        cookie.name, domain, host
                    );
                    continue;
                }
                None => (host.clone(), true),
            };
            let path = match cookie.path.take() {
                Some(path) if path.starts_with('/') => path,
                _ => default_path(url),
            };
            cookie.domain = Some(domain.clone());
            cookie.path = Some(path.clone());

            let existing = entries.iter().position(|stored| {
                stored.domain == domain && stored.path == path && stored.cookie.name == cookie.name
            });

            if cookie.is_expired_at(now) {
                if let Some(i) = existing {
                    entries.remove(i);
                }
                continue;
            }
            if let Some(max_age) = cookie.max_age.take() {
                cookie.expires = Some(now + Duration::seconds(max_age));
            }

            let stored = StoredCookie {
                cookie,
                domain,
                path,
                host_only,
            };
            match existing {
                Some(i) => entries[i] = stored,
                None => entries.push(stored),
            }
        }
    }
}

fn domain_match(host: &str, domain: &str) -> bool {
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
}

fn path_match(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/')
            || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/'))
}

fn default_path(url: &Url) -> String {
    let path = url.path();
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(i) => path[..i].to_string(),
    }
}
