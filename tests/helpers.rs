// Shared test helpers for mock servers.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a `status` redirect from `from` to `to` for `verb` requests.
#[allow(dead_code)] // Used by other test files
pub async fn mount_redirect(server: &MockServer, verb: &str, from: &str, to: &str, status: u16) {
    Mock::given(method(verb))
        .and(path(from))
        .respond_with(ResponseTemplate::new(status).insert_header("Location", to))
        .mount(server)
        .await;
}

/// Mounts `/r/N` -> `/r/N-1` for N in `1..=hops`, and `/r/0` answering "done".
#[allow(dead_code)] // Used by other test files
pub async fn mount_countdown(server: &MockServer, hops: usize) {
    for n in 1..=hops {
        mount_redirect(server, "GET", &format!("/r/{n}"), &format!("/r/{}", n - 1), 302).await;
    }
    Mock::given(method("GET"))
        .and(path("/r/0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(server)
        .await;
}

/// Returns a URL on 127.0.0.1 with nothing listening on it.
#[allow(dead_code)] // Used by other test files
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("Failed to read address").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}
