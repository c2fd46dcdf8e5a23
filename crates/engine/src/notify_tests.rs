// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_well_formed_notify_url() {
    let (host, token) = parse_notify_url("http://example.com:9000/abc123").unwrap();
    assert_eq!(host, "http://example.com:9000");
    assert_eq!(token, "abc123");
}

#[test]
fn rejects_url_without_token_path() {
    assert!(parse_notify_url("http://example.com:9000/").is_none());
}

#[test]
fn rejects_non_http_scheme() {
    assert!(parse_notify_url("https://example.com:9000/abc123").is_none());
}

#[test]
fn base64_matches_known_vectors() {
    assert_eq!(base64_encode(b""), "");
    assert_eq!(base64_encode(b"f"), "Zg==");
    assert_eq!(base64_encode(b"fo"), "Zm8=");
    assert_eq!(base64_encode(b"foo"), "Zm9v");
    assert_eq!(base64_encode(b"foobar"), "Zm9vYmFy");
}

#[tokio::test]
async fn absent_notify_url_is_a_no_op() {
    notify(None, "hello", None).await.unwrap();
}

#[tokio::test]
async fn malformed_notify_url_is_reported_not_panicked() {
    let result = notify(Some("not-a-url"), "hello", None).await;
    assert!(result.is_err());
}
