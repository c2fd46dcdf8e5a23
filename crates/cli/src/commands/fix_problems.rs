// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uap fix-problems` — report (and, with `--srsly`, delete) stale ping
//! files.

use anyhow::Result;
use clap::Args;
use std::path::Path;
use uap_engine::fix_problems::{find_stale_pings, remove_stale_pings};
use uap_engine::{backend_for, StaleKind};

use super::common::{live_jobs, resolve_cluster_kind};

#[derive(Args)]
pub struct FixProblemsArgs {
    /// Print every stale ping's path, not just the counts.
    #[arg(long)]
    pub details: bool,

    /// Actually delete the stale ping files; without this flag, only a
    /// report is printed.
    #[arg(long)]
    pub srsly: bool,
}

pub async fn run(args: FixProblemsArgs, config_path: &Path) -> Result<i32> {
    let pipeline = super::common::load_pipeline(config_path)?;
    let backend = resolve_cluster_kind(None, &pipeline.config)
        .await?
        .map(backend_for);
    let live = live_jobs(backend.as_ref()).await;
    let ping_timeout = std::time::Duration::from_secs(pipeline.config.ping_timeout_secs);

    let problems = find_stale_pings(
        &pipeline,
        live.as_ref(),
        ping_timeout,
        std::time::SystemTime::now(),
    );

    let run_problems = problems
        .iter()
        .filter(|p| p.kind == StaleKind::StaleRunPing)
        .count();
    let queue_problems = problems
        .iter()
        .filter(|p| p.kind == StaleKind::StaleQueuedPing)
        .count();

    if run_problems > 0 {
        println!("Warning: there are {run_problems} stale run ping files.");
    }
    if queue_problems > 0 {
        println!("Warning: there are {queue_problems} tasks marked as queued that do not seem to be queued.");
    }
    if args.details {
        for problem in &problems {
            println!("{:?} {} {}", problem.kind, problem.task_id, problem.ping_path.display());
        }
    }

    if args.srsly {
        remove_stale_pings(&problems).await?;
        println!("removed {} stale ping files.", problems.len());
    } else if !problems.is_empty() {
        println!("Hint: pass --srsly to delete these ping files.");
    }

    Ok(0)
}

#[cfg(test)]
#[path = "fix_problems_tests.rs"]
mod tests;
