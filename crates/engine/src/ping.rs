// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ping sidecar files: `.run-<run_id>.ping` marks a task executing
//! locally, `.queued-<run_id>.ping` marks a task submitted to a cluster.
//! Both live alongside a step's outputs and are removed on successful
//! completion.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use uap_core::id::RunId;

#[derive(Debug, Serialize, Deserialize)]
pub struct RunPing {
    pub start_time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueuedPing {
    pub job_id: String,
    pub submit_time: String,
}

pub fn run_ping_path(output_dir: &Path, run_id: &RunId) -> PathBuf {
    output_dir.join(format!(".run-{run_id}.ping"))
}

pub fn queued_ping_path(output_dir: &Path, run_id: &RunId) -> PathBuf {
    output_dir.join(format!(".queued-{run_id}.ping"))
}

/// Write (or overwrite) the run ping with `start_time`.
pub async fn write_run_ping(output_dir: &Path, run_id: &RunId, start_time: &str) -> std::io::Result<()> {
    let path = run_ping_path(output_dir, run_id);
    let body = serde_yaml::to_string(&RunPing {
        start_time: start_time.to_string(),
    })
    .unwrap_or_default();
    tokio::fs::write(&path, body).await
}

/// Refresh the run ping's mtime (the background ticker's touch). Rewrites
/// the file's existing content, which is sufficient to advance its mtime
/// without needing a dedicated utime syscall wrapper.
pub async fn touch_run_ping(output_dir: &Path, run_id: &RunId) -> std::io::Result<()> {
    let path = run_ping_path(output_dir, run_id);
    let body = tokio::fs::read(&path).await?;
    tokio::fs::write(&path, body).await
}

pub async fn write_queued_ping(
    output_dir: &Path,
    run_id: &RunId,
    job_id: &str,
    submit_time: &str,
) -> std::io::Result<()> {
    let path = queued_ping_path(output_dir, run_id);
    let body = serde_yaml::to_string(&QueuedPing {
        job_id: job_id.to_string(),
        submit_time: submit_time.to_string(),
    })
    .unwrap_or_default();
    tokio::fs::write(&path, body).await
}

/// Remove a ping file; absence is not an error.
pub async fn remove_ping(path: &Path) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// The age of a ping file's mtime relative to `now`, or `None` if the file
/// is absent.
pub fn ping_age(path: &Path, now: SystemTime) -> Option<std::time::Duration> {
    let metadata = std::fs::metadata(path).ok()?;
    let mtime = metadata.modified().ok()?;
    now.duration_since(mtime).ok()
}

#[cfg(test)]
#[path = "ping_tests.rs"]
mod tests;
