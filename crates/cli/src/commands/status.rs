// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uap status` — print every task's derived state.

use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::time::Duration;
use uap_engine::{backend_for, state_engine::task_state, FsCache};

use super::common::{live_jobs, resolve_cluster_kind};

#[derive(Args)]
pub struct StatusArgs {
    /// Print each task's output directory alongside its state.
    #[arg(long)]
    pub details: bool,
}

pub async fn run(args: StatusArgs, config_path: &Path) -> Result<i32> {
    let pipeline = super::common::load_pipeline(config_path)?;
    let backend = resolve_cluster_kind(None, &pipeline.config)
        .await?
        .map(backend_for);
    let live = live_jobs(backend.as_ref()).await.unwrap_or_default();
    let fscache = FsCache::new();
    let ping_timeout = Duration::from_secs(pipeline.config.ping_timeout_secs);

    let mut counts = std::collections::BTreeMap::new();
    for task_id in pipeline.task_ids() {
        let state = task_state(&pipeline, &task_id, &fscache, &live, ping_timeout);
        *counts.entry(state.primary.to_string()).or_insert(0u32) += 1;
        if args.details {
            let output_dir = pipeline
                .output_dir_for(&task_id.step_name)
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("{task_id:<30} {state:<20} {output_dir}");
        } else {
            println!("{task_id:<30} {state}");
        }
    }

    if args.details {
        println!();
        for (state, count) in counts {
            println!("{count:>4} {state}");
        }
    }

    Ok(0)
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
