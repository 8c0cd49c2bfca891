// Response module tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::channel::mpsc;
use futures::stream;
use futures::FutureExt;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Deserialize;

use super::*;

fn raw(status: u16, body: RawBody) -> RawResponse {
    RawResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        url: Url::parse("http://example.com/dir/page").unwrap(),
        body,
    }
}

/// A body that counts how many times its stream is polled to completion.
fn counted_body(content: &'static str, reads: Arc<AtomicUsize>) -> RawBody {
    RawBody::from_stream(stream::once(async move {
        reads.fetch_add(1, Ordering::SeqCst);
        Ok(Bytes::from_static(content.as_bytes()))
    }))
}

#[test]
fn test_status_classes() {
    for (code, success, redirect, client, server) in [
        (200, true, false, false, false),
        (204, true, false, false, false),
        (303, false, true, false, false),
        (404, false, false, true, false),
        (503, false, false, false, true),
    ] {
        let resp = Response::from(raw(code, RawBody::empty()));
        assert_eq!(resp.status().as_u16(), code);
        assert_eq!(resp.is_success(), success, "{code}");
        assert_eq!(resp.is_redirect(), redirect, "{code}");
        assert_eq!(resp.is_client_error(), client, "{code}");
        assert_eq!(resp.is_server_error(), server, "{code}");
        assert!(!resp.redirect_forbidden());
        assert!(resp.history().is_empty());
    }
}

#[tokio::test]
async fn test_content_is_read_once_and_cached() {
    let reads = Arc::new(AtomicUsize::new(0));
    let mut resp = Response::from(raw(200, counted_body("Body", reads.clone())));

    assert_eq!(&resp.content().await.unwrap()[..], b"Body");
    assert_eq!(&resp.content().await.unwrap()[..], b"Body");
    assert_eq!(reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_text_twice_returns_same_string() {
    let mut resp = Response::from(raw(200, RawBody::from("Body")));
    assert_eq!(resp.text().await.unwrap(), "Body");
    assert_eq!(resp.text().await.unwrap(), "Body");
}

#[tokio::test]
async fn test_chunked_body_is_concatenated() {
    let chunks = vec![
        Ok(Bytes::from_static(b"Body here\n")),
        Ok(Bytes::from_static(b"continued")),
    ];
    let mut resp = Response::from(raw(200, RawBody::from_stream(stream::iter(chunks))));
    assert_eq!(resp.text().await.unwrap(), "Body here\ncontinued");
}

#[tokio::test]
async fn test_failed_body_stays_failed() {
    let chunks = vec![
        Ok(Bytes::from_static(b"partial")),
        Err(TransportError::new(TransportErrorKind::Body, "connection reset")),
    ];
    let mut resp = Response::from(raw(200, RawBody::from_stream(stream::iter(chunks))));
    assert!(matches!(resp.content().await, Err(Error::Body(_))));
    assert!(matches!(resp.content().await, Err(Error::Body(_))));
}

#[tokio::test]
async fn test_cancelled_read_resumes() {
    let (tx, rx) = mpsc::unbounded::<std::result::Result<Bytes, TransportError>>();
    let mut resp = Response::from(raw(200, RawBody::from_stream(rx)));

    tx.unbounded_send(Ok(Bytes::from_static(b"Body "))).unwrap();
    // First chunk is read, then the future is dropped while waiting.
    assert!(resp.content().now_or_never().is_none());

    tx.unbounded_send(Ok(Bytes::from_static(b"here"))).unwrap();
    drop(tx);
    assert_eq!(&resp.content().await.unwrap()[..], b"Body here");
    assert_eq!(resp.text().await.unwrap(), "Body here");
}

#[tokio::test]
async fn test_released_body_is_empty() {
    let reads = Arc::new(AtomicUsize::new(0));
    let mut resp = Response::from(raw(302, counted_body("moved", reads.clone())));
    resp.release_body();
    assert!(resp.content().await.unwrap().is_empty());
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_json_decoding() {
    #[derive(Deserialize)]
    struct Echo {
        data: String,
    }

    let mut resp = Response::from(raw(200, RawBody::from(r#"{"data":"content"}"#)));
    let echo: Echo = resp.json().await.unwrap();
    assert_eq!(echo.data, "content");

    let again: Result<Echo> = resp.json().await;
    assert!(again.is_ok(), "cached body decodes again");
}

#[tokio::test]
async fn test_json_error() {
    let mut resp = Response::from(raw(200, RawBody::from("not json")));
    let result: Result<serde_json::Value> = resp.json().await;
    assert!(matches!(result, Err(Error::Json(_))));
}

#[tokio::test]
async fn test_xml_decoding() {
    #[derive(Deserialize)]
    struct Slide {
        title: String,
    }

    let mut resp = Response::from(raw(
        200,
        RawBody::from("<slide><title>Overview</title></slide>"),
    ));
    let slide: Slide = resp.xml().await.unwrap();
    assert_eq!(slide.title, "Overview");
}

#[test]
fn test_cookies_last_occurrence_wins() {
    let mut r = raw(200, RawBody::empty());
    r.headers
        .append(SET_COOKIE, HeaderValue::from_static("foo=first"));
    r.headers
        .append(SET_COOKIE, HeaderValue::from_static("bar=1; Path=/"));
    r.headers
        .append(SET_COOKIE, HeaderValue::from_static("foo=second"));
    r.headers
        .append(SET_COOKIE, HeaderValue::from_static("=broken"));
    let resp = Response::from(r);

    assert_eq!(resp.cookies().len(), 3);
    assert_eq!(resp.cookie("foo").map(|c| c.value.as_str()), Some("second"));
    assert_eq!(resp.cookie("bar").and_then(|c| c.path.as_deref()), Some("/"));
    assert!(resp.cookie("baz").is_none());
}

#[test]
fn test_location_resolves_relative() {
    let mut r = raw(302, RawBody::empty());
    r.headers
        .insert(LOCATION, HeaderValue::from_static("../other?x=1"));
    r.headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    let resp = Response::from(r);
    assert_eq!(
        resp.location().map(|u| u.to_string()),
        Some("http://example.com/other?x=1".to_string())
    );
    assert_eq!(resp.header("content-type"), Some("text/html"));
}

#[test]
fn test_location_accepts_raw_utf8() {
    let mut r = raw(302, RawBody::empty());
    r.headers.insert(
        LOCATION,
        HeaderValue::from_bytes("/café".as_bytes()).unwrap(),
    );
    let resp = Response::from(r);
    assert!(resp.header("location").is_none());
    assert_eq!(
        resp.location().map(|u| u.path().to_string()),
        Some("/caf%C3%A9".to_string())
    );
}
