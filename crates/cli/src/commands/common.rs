// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared setup used by every subcommand: load the configuration, build
//! the pipeline against the demo step registry, and enforce the dirty
//! working tree refusal.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tokio::signal::unix::{signal, SignalKind};
use uap_config::Config;
use uap_engine::git::GitState;
use uap_engine::{ClusterBackend, ClusterKind, Pipeline};

use crate::steps::demo_registry;

pub fn load_pipeline(config_path: &Path) -> Result<Pipeline> {
    let config = uap_config::load(config_path)
        .with_context(|| format!("loading configuration {}", config_path.display()))?;
    build_pipeline(config)
}

pub fn build_pipeline(config: Config) -> Result<Pipeline> {
    let registry = demo_registry();
    Pipeline::build(config, &registry, false)
        .context("building the step graph and declaring runs")
}

/// Capture the repository's provenance and refuse to proceed if the
/// working tree is dirty and `--even-if-dirty` was not passed. Run from
/// the config file's containing directory, since that's the tree whose
/// cleanliness actually matters to the pipeline being executed.
pub async fn capture_git_state_or_refuse(config_path: &Path, even_if_dirty: bool) -> Result<GitState> {
    let cwd = config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let git_state = uap_engine::git::capture(&cwd).await;
    if git_state.dirty && !even_if_dirty {
        anyhow::bail!(
            "the repository at {} has uncommitted changes; pass --even-if-dirty to proceed anyway",
            cwd.display()
        );
    }
    Ok(git_state)
}

/// Resolve which cluster backend to use: an explicit `--cluster` flag
/// (ignoring the literal value `"auto"`) wins, then the configuration's
/// `cluster` override key, then autodetection.
pub async fn resolve_cluster_kind(
    explicit: Option<&str>,
    config: &Config,
) -> Result<Option<ClusterKind>> {
    if let Some(explicit) = explicit {
        if explicit != "auto" {
            return Ok(Some(
                explicit
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?,
            ));
        }
    }
    if let Some(configured) = &config.cluster {
        return Ok(Some(
            configured
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?,
        ));
    }
    Ok(uap_engine::autodetect().await)
}

/// The set of job ids the batch queue currently reports live. `None` means
/// there is a cluster backend but its `stat` tool could not be probed, as
/// distinct from `Some(empty)` meaning no cluster is configured at all (so
/// there can be no live jobs) or the probe succeeded and found none.
/// Callers must not collapse the two: a failed probe says nothing about
/// which queued pings are still live, while no cluster at all means none
/// of them can be.
pub async fn live_jobs(backend: Option<&ClusterBackend>) -> Option<HashSet<String>> {
    let Some(backend) = backend else {
        return Some(HashSet::new());
    };
    uap_engine::live_jobs(backend).await
}

/// Race `fut` against SIGTERM/SIGINT. Returns `Some(output)` if `fut`
/// finished first, `None` if a signal arrived first. In the `None` case
/// `fut` is dropped mid-flight, which kills any child process it still
/// owns via `kill_on_drop`.
pub async fn run_cancellable<F: std::future::Future>(fut: F) -> Result<Option<F::Output>> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("installing SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("installing SIGINT handler")?;
    tokio::pin!(fut);
    tokio::select! {
        output = &mut fut => Ok(Some(output)),
        _ = sigterm.recv() => {
            tracing::warn!("received SIGTERM, cancelling in-flight task");
            Ok(None)
        }
        _ = sigint.recv() => {
            tracing::warn!("received SIGINT, cancelling in-flight task");
            Ok(None)
        }
    }
}
