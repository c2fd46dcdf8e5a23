// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn elapsed_seconds() {
    assert_eq!(format_elapsed(5), "5s");
    assert_eq!(format_elapsed(59), "59s");
}

#[test]
fn elapsed_minutes() {
    assert_eq!(format_elapsed(60), "1m");
    assert_eq!(format_elapsed(125), "2m");
}

#[test]
fn elapsed_hours() {
    assert_eq!(format_elapsed(3600), "1h");
    assert_eq!(format_elapsed(3600 + 30 * 60), "1h30m");
}

#[test]
fn elapsed_days() {
    assert_eq!(format_elapsed(86400), "1d");
    assert_eq!(format_elapsed(3 * 86400), "3d");
}

#[test]
fn elapsed_ms_wraps_elapsed() {
    assert_eq!(format_elapsed_ms(5_000), "5s");
    assert_eq!(format_elapsed_ms(61_000), "1m");
}

#[test]
fn bytes_under_one_kibibyte() {
    assert_eq!(format_bytes(512), "512B");
}

#[test]
fn bytes_scales_up() {
    assert_eq!(format_bytes(4096), "4.0KiB");
    assert_eq!(format_bytes(1024 * 1024 * 3 / 2), "1.5MiB");
}

#[test]
fn rfc3339_formats_the_epoch() {
    assert_eq!(format_rfc3339(UNIX_EPOCH), "1970-01-01T00:00:00Z");
}

#[test]
fn rfc3339_formats_a_known_timestamp() {
    // 2026-01-01T00:00:00Z
    let t = UNIX_EPOCH + std::time::Duration::from_secs(1_767_225_600);
    assert_eq!(format_rfc3339(t), "2026-01-01T00:00:00Z");
}

#[test]
fn rfc3339_rounds_within_the_same_second() {
    let t = UNIX_EPOCH + std::time::Duration::from_millis(1_767_225_600_500);
    assert_eq!(format_rfc3339(t), "2026-01-01T00:00:00Z");
}
