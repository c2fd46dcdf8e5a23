// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status notifications: if the configuration carries a `notify` URL of
//! the form `http://<host>:<port>/<token>`, POST
//! `{token, message, attachment_name?, attachment_data?}` to it. Rather
//! than pull in an HTTP client dependency nothing else in this workspace
//! needs, this shells out to `curl`. Every failure here is logged and
//! swallowed — a broken notification channel must never crash a pipeline
//! run.

use crate::error::NotificationError;
use regex::Regex;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Serialize)]
struct NotifyPayload {
    token: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment_data: Option<String>,
}

/// Split a `notify` URL into `(host_and_port, token)`, e.g.
/// `http://example.com:9000/abc123` -> `("http://example.com:9000",
/// "abc123")`.
fn parse_notify_url(url: &str) -> Option<(String, String)> {
    #[allow(clippy::unwrap_used)]
    let re = Regex::new(r"^(http://[a-zA-Z0-9.\-]+:\d+)/([a-zA-Z0-9]+)$").unwrap();
    let caps = re.captures(url)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// POST a status `message` (and optional base64-encoded attachment) to the
/// configured `notify` endpoint. Returns `Ok(())` whenever there is
/// nothing to do (`notify_url` is `None`) or the message was handed to
/// `curl` successfully; any transport failure is reported as a
/// [`NotificationError`] for the caller to log, never to propagate.
pub async fn notify(
    notify_url: Option<&str>,
    message: &str,
    attachment: Option<(&str, &[u8])>,
) -> Result<(), NotificationError> {
    let Some(url) = notify_url else {
        return Ok(());
    };
    let Some((host, token)) = parse_notify_url(url) else {
        return Err(NotificationError(format!("malformed notify URL {url:?}")));
    };

    let payload = NotifyPayload {
        token,
        message: message.to_string(),
        attachment_name: attachment.map(|(name, _)| name.to_string()),
        attachment_data: attachment.map(|(_, data)| base64_encode(data)),
    };
    let body = serde_json::to_vec(&payload)
        .map_err(|e| NotificationError(format!("failed to encode notify payload: {e}")))?;

    let mut child = Command::new("curl")
        .arg(&host)
        .arg("-X")
        .arg("POST")
        .arg("-d")
        .arg("@-")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| NotificationError(format!("failed to spawn curl: {e}")))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(&body)
            .await
            .map_err(|e| NotificationError(format!("failed to write to curl stdin: {e}")))?;
    }

    let status = child
        .wait()
        .await
        .map_err(|e| NotificationError(format!("curl did not exit cleanly: {e}")))?;
    if !status.success() {
        tracing::warn!(%status, "notify curl exited non-zero");
    }
    Ok(())
}

fn base64_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied();
        let b2 = chunk.get(2).copied();

        out.push(ALPHABET[(b0 >> 2) as usize] as char);
        out.push(ALPHABET[(((b0 & 0x03) << 4) | (b1.unwrap_or(0) >> 4)) as usize] as char);
        out.push(match b1 {
            Some(b1) => ALPHABET[(((b1 & 0x0f) << 2) | (b2.unwrap_or(0) >> 6)) as usize] as char,
            None => '=',
        });
        out.push(match b2 {
            Some(b2) => ALPHABET[(b2 & 0x3f) as usize] as char,
            None => '=',
        });
    }
    out
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
