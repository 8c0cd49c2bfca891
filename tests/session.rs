//! Session behavior over the `reqwest` transport.
//!
//! These tests verify:
//! - Cookies set during a redirect chain are sent on the following hops
//! - Cookies persist across requests of the same session
//! - `Session::cookies` defaults to the last URL the session issued
//! - The session User-Agent is sent

use anyhow::Context;
use requests::{Session, SessionConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `/cookies/set` sets `foo=bar` and redirects to `/cookies`, which only
/// answers 200 when the cookie comes back.
async fn mount_cookie_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cookies/set"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Set-Cookie", "foo=bar; Path=/")
                .insert_header("Location", "/cookies"),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cookies"))
        .and(header("Cookie", "foo=bar"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"cookies":{"foo":"bar"}}"#),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cookies"))
        .respond_with(ResponseTemplate::new(401))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cookie_set_during_redirect_is_sent() {
    let server = MockServer::start().await;
    mount_cookie_endpoints(&server).await;
    let session = Session::new();

    let mut resp = session
        .get(format!("{}/cookies/set?foo=bar", server.uri()))
        .send()
        .await
        .expect("request should succeed");

    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.expect("json body");
    assert_eq!(body["cookies"]["foo"], "bar");
    assert_eq!(
        resp.history()[0].cookie("foo").map(|c| c.value.as_str()),
        Some("bar")
    );
    assert_eq!(
        session.cookie("foo", None).map(|c| c.value),
        Some("bar".to_string())
    );
}

#[tokio::test]
async fn test_cookies_persist_across_requests() {
    let server = MockServer::start().await;
    mount_cookie_endpoints(&server).await;
    let session = Session::new();

    let first = session
        .get(format!("{}/cookies/set", server.uri()))
        .allow_redirects(false)
        .send()
        .await
        .expect("first request should succeed");
    assert!(first.redirect_forbidden());

    let second = session
        .get(format!("{}/cookies", server.uri()))
        .send()
        .await
        .expect("second request should succeed");
    assert_eq!(second.status().as_u16(), 200);
}

#[tokio::test]
async fn test_free_function_has_no_jar() {
    let server = MockServer::start().await;
    mount_cookie_endpoints(&server).await;

    let resp = requests::get(format!("{}/cookies/set", server.uri()))
        .send()
        .await
        .expect("request should succeed");
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn test_session_user_agent_is_sent() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("User-Agent", "Mozilla/5.0 (test)"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::with_config(SessionConfig {
        user_agent: "Mozilla/5.0 (test)".to_string(),
        ..Default::default()
    });
    let mut resp = session
        .get(format!("{}/ua", server.uri()))
        .send()
        .await
        .context("request should succeed")?;
    assert!(resp.is_success());
    assert_eq!(resp.text().await?, "hello");
    Ok(())
}
