//! Tests for status classification and the `ureq` transport.

use super::*;
use rstest::rstest;
use std::io::Cursor;

fn response(status: u16, status_text: &str, body: &'static [u8]) -> RawResponse {
    RawResponse {
        status,
        status_text: status_text.to_owned(),
        body: Box::new(Cursor::new(body)),
    }
}

#[test]
fn fetch_returns_body_for_ok() {
    let mut transport = MockHttpGet::new();
    transport
        .expect_get()
        .withf(|url, deadline| url == "http://proxy.test/a.info" && deadline.is_none())
        .times(1)
        .returning(|_, _| Ok(response(200, "200 OK", b"hello")));

    let mut body = fetch(&transport, "http://proxy.test/a.info", None).expect("fetch");
    let mut text = String::new();
    body.read_to_string(&mut text).expect("read body");
    assert_eq!(text, "hello");
}

#[rstest]
#[case(404, "404 Not Found")]
#[case(410, "410 Gone")]
#[case(500, "500 Internal Server Error")]
#[case(204, "204 No Content")]
fn fetch_classifies_non_ok_statuses(#[case] status: u16, #[case] text: &'static str) {
    let mut transport = MockHttpGet::new();
    transport
        .expect_get()
        .times(1)
        .returning(move |_, _| Ok(response(status, text, b"")));

    let err = fetch(&transport, "http://proxy.test/a.zip", None)
        .err()
        .expect("non-200 must fail");
    assert_eq!(
        err.to_string(),
        format!("http.Get(\"http://proxy.test/a.zip\") returned response: {status} (\"{text}\")")
    );
    assert_eq!(err.status(), Some(status));
}

#[test]
fn fetch_passes_deadline_through() {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut transport = MockHttpGet::new();
    transport
        .expect_get()
        .withf(move |_, seen| *seen == Some(deadline))
        .times(1)
        .returning(|_, _| Ok(response(200, "200 OK", b"")));

    assert!(fetch(&transport, "http://proxy.test/a.info", Some(deadline)).is_ok());
}

#[test]
fn fetch_wraps_transport_failures_with_url() {
    let mut transport = MockHttpGet::new();
    transport.expect_get().times(1).returning(|_, _| {
        Err(TransportFailure {
            kind: TransportKind::Connect,
            reason: "connection refused".to_owned(),
        })
    });

    let err = fetch(&transport, "http://proxy.test/a.info", None)
        .err()
        .expect("transport failure must surface");
    match err {
        ProxyError::Transport { url, kind, reason } => {
            assert_eq!(url, "http://proxy.test/a.info");
            assert_eq!(kind, TransportKind::Connect);
            assert_eq!(reason, "connection refused");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[rstest]
#[case(StatusCode::OK, "200 OK")]
#[case(StatusCode::NOT_FOUND, "404 Not Found")]
#[case(StatusCode::GONE, "410 Gone")]
fn status_text_joins_code_and_reason(#[case] status: StatusCode, #[case] expected: &str) {
    assert_eq!(status_text(status), expected);
}

#[test]
fn status_text_without_reason_is_the_code() {
    let status = StatusCode::from_u16(599).expect("valid status code");
    assert_eq!(status_text(status), "599");
}

#[test]
fn elapsed_deadline_fails_without_sending() {
    let transport = UreqTransport::default();
    let deadline = Instant::now()
        .checked_sub(Duration::from_secs(1))
        .unwrap_or_else(Instant::now);

    let failure = transport
        .get("http://127.0.0.1:9/never", Some(deadline))
        .expect_err("elapsed deadline must fail");
    assert_eq!(failure.kind, TransportKind::Timeout);
}

#[test]
fn effective_timeout_is_clipped_to_deadline() {
    let transport = UreqTransport::new(Some(Duration::from_secs(30)));
    let timeout = transport
        .effective_timeout(Instant::now() + Duration::from_secs(2))
        .expect("deadline in the future");
    assert!(timeout <= Duration::from_secs(2));

    let unbounded = UreqTransport::new(None);
    let timeout = unbounded
        .effective_timeout(Instant::now() + Duration::from_secs(60))
        .expect("deadline in the future");
    assert!(timeout > Duration::from_secs(30));
}

#[test]
fn refused_connection_is_a_connect_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let transport = UreqTransport::new(Some(Duration::from_secs(5)));
    let failure = transport
        .get(&format!("http://{addr}/my.mod/module/@v/v1.0.0.info"), None)
        .expect_err("closed port must fail");
    assert_ne!(failure.kind, TransportKind::Timeout);
}
