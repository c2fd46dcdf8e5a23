// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task/state derivation: for each task, combine filesystem
//! existence/mtime facts, ping liveness, and the set of job ids the
//! cluster currently reports live into one [`TaskState`]. All filesystem
//! facts are read through a [`TimeSource`] so dry-run mode (a virtual
//! `path -> timestamp` map) and the real [`crate::fscache::FsCache`]
//! share the same derivation code.

use crate::ping::{queued_ping_path, run_ping_path, QueuedPing};
use crate::pipeline::Pipeline;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use uap_core::task::{PrimaryState, TaskId, TaskState};

/// Default `PING_TIMEOUT`: ten minutes, overridable via the configuration's
/// `ping_timeout_secs` key.
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(600);

/// Abstracts the filesystem facts the state engine needs, so real execution
/// (backed by [`crate::fscache::FsCache`]) and dry-run planning (backed by a
/// virtual clock map) share one derivation path.
pub trait TimeSource {
    fn exists(&self, path: &Path) -> bool;
    fn mtime(&self, path: &Path) -> Option<SystemTime>;
    fn now(&self) -> SystemTime;
}

impl TimeSource for crate::fscache::FsCache {
    fn exists(&self, path: &Path) -> bool {
        crate::fscache::FsCache::exists(self, path)
    }

    fn mtime(&self, path: &Path) -> Option<SystemTime> {
        crate::fscache::FsCache::mtime(self, path)
    }

    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Substitutes a virtual `path -> timestamp` map for every filesystem
/// call. Executing a task against a `DryRunCache` should stamp every
/// declared output with
/// [`DryRunCache::stamp`] so downstream tasks see the planned reality.
#[derive(Debug, Default)]
pub struct DryRunCache {
    stamps: parking_lot::Mutex<std::collections::HashMap<PathBuf, SystemTime>>,
    virtual_now: std::sync::atomic::AtomicU64,
}

impl DryRunCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `path` would exist as of the current virtual clock,
    /// advancing the clock by one tick so later stamps are strictly newer.
    pub fn stamp(&self, path: &Path) {
        let tick = self
            .virtual_now
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        self.stamps
            .lock()
            .insert(path.to_path_buf(), SystemTime::UNIX_EPOCH + Duration::from_secs(tick));
    }
}

impl TimeSource for DryRunCache {
    fn exists(&self, path: &Path) -> bool {
        self.stamps.lock().contains_key(path)
    }

    fn mtime(&self, path: &Path) -> Option<SystemTime> {
        self.stamps.lock().get(path).copied()
    }

    fn now(&self) -> SystemTime {
        let tick = self.virtual_now.load(std::sync::atomic::Ordering::SeqCst);
        SystemTime::UNIX_EPOCH + Duration::from_secs(tick)
    }
}

/// Derive the state of `task_id` in `pipeline`, given the set of cluster job
/// ids currently known to be alive (empty when running purely locally).
pub fn task_state(
    pipeline: &Pipeline,
    task_id: &TaskId,
    time_source: &dyn TimeSource,
    live_jobs: &HashSet<String>,
    ping_timeout: Duration,
) -> TaskState {
    let Some(run) = pipeline.run_for(task_id) else {
        return TaskState::new(PrimaryState::Waiting, false);
    };
    let Some(output_dir) = pipeline.output_dir_for(&task_id.step_name) else {
        return TaskState::new(PrimaryState::Waiting, false);
    };

    let outs: Vec<&PathBuf> = run.all_output_files().collect();
    let ins = run.all_input_files();

    let in_ok = ins.iter().all(|p| time_source.exists(p));
    let out_ok = outs.iter().all(|o| time_source.exists(o))
        && outs.iter().all(|o| {
            run.output_files
                .values()
                .filter_map(|m| m.get(*o))
                .flatten()
                .all(|i| mtime_le(time_source, i, o))
        });
    let changed = !outs.is_empty()
        && outs.iter().all(|o| time_source.exists(o))
        && outs.iter().any(|o| {
            run.output_files
                .values()
                .filter_map(|m| m.get(*o))
                .flatten()
                .any(|i| !mtime_le(time_source, i, o))
        });

    let queued_path = queued_ping_path(output_dir, &task_id.run_id);
    let run_path = run_ping_path(output_dir, &task_id.run_id);

    let primary = if let Some(queued) = read_queued_job_id(time_source, &queued_path) {
        if live_jobs.contains(&queued) {
            PrimaryState::Queued
        } else if run_ping_is_fresh(time_source, &run_path, ping_timeout) {
            PrimaryState::Executing
        } else if out_ok {
            PrimaryState::Finished
        } else if in_ok {
            PrimaryState::Ready
        } else {
            PrimaryState::Waiting
        }
    } else if run_ping_is_fresh(time_source, &run_path, ping_timeout) {
        PrimaryState::Executing
    } else if out_ok {
        PrimaryState::Finished
    } else if in_ok {
        PrimaryState::Ready
    } else {
        PrimaryState::Waiting
    };

    TaskState::new(primary, changed)
}

fn mtime_le(time_source: &dyn TimeSource, input: &Path, output: &Path) -> bool {
    match (time_source.mtime(input), time_source.mtime(output)) {
        (Some(i), Some(o)) => i <= o,
        _ => true,
    }
}

fn run_ping_is_fresh(time_source: &dyn TimeSource, ping_path: &Path, timeout: Duration) -> bool {
    if !time_source.exists(ping_path) {
        return false;
    }
    match time_source.mtime(ping_path) {
        Some(mtime) => time_source
            .now()
            .duration_since(mtime)
            .map(|age| age <= timeout)
            .unwrap_or(true),
        None => true,
    }
}

/// The queued ping's `job_id`, if the ping file exists and parses. This
/// reads the ping payload from disk directly (pings are small, rarely
/// re-read) rather than through the [`TimeSource`] abstraction, which only
/// models existence/mtime.
fn read_queued_job_id(time_source: &dyn TimeSource, ping_path: &Path) -> Option<String> {
    if !time_source.exists(ping_path) {
        return None;
    }
    let text = std::fs::read_to_string(ping_path).ok()?;
    let ping: QueuedPing = serde_yaml::from_str(&text).ok()?;
    Some(ping.job_id)
}

#[cfg(test)]
#[path = "state_engine_tests.rs"]
mod tests;
