// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stable option hashing used to derive a step's output directory path.
//!
//! Canonicalization means: object keys sorted, no insignificant whitespace.
//! `serde_json::Value`'s `Map` is a `BTreeMap` under the `preserve_order`
//! feature being *off* (the default, which this workspace uses), so
//! `serde_json::to_string` on a `Value` already yields sorted-key output.

use sha1::{Digest, Sha1};

/// Returns the first 8 hex characters of the SHA-1 digest of the options,
/// serialized canonically. Semantically equal options (same keys/values,
/// any declaration order) always hash identically.
pub fn options_hashtag(options: &serde_json::Value) -> String {
    let canonical =
        serde_json::to_string(options).unwrap_or_else(|_| "null".to_string());
    let digest = Sha1::digest(canonical.as_bytes());
    let hex = hex_encode(&digest);
    hex[..8].to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
#[path = "options_hash_tests.rs"]
mod tests;
