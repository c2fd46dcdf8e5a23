// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uap run-locally [TASK...]` — execute every READY task in-process, in
//! topological order, one at a time. A SIGTERM or SIGINT received while a
//! task is running cancels that task (its child process is killed via
//! `kill_on_drop`) and stops before starting the next one.

use anyhow::Result;
use clap::Args;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use uap_core::task::TaskId;
use uap_engine::state_engine::{task_state, DEFAULT_PING_TIMEOUT};
use uap_engine::{backend_for, execute_task, tools::check_tools, FsCache};

use super::common::{capture_git_state_or_refuse, live_jobs, resolve_cluster_kind, run_cancellable};

#[derive(Args)]
pub struct RunLocallyArgs {
    /// Restrict execution to these task ids (`step_name/run_id`); runs
    /// every READY task if omitted.
    pub tasks: Vec<String>,

    /// Proceed even if the repository's working tree is dirty.
    #[arg(long = "even-if-dirty")]
    pub even_if_dirty: bool,

    /// How often the background run-ping ticker touches a task's ping
    /// file while it executes, in seconds.
    #[arg(long, default_value_t = 60)]
    pub ping_touch_interval_secs: u64,
}

pub async fn run(args: RunLocallyArgs, config_path: &Path) -> Result<i32> {
    let git_state = capture_git_state_or_refuse(config_path, args.even_if_dirty).await?;
    let pipeline = super::common::load_pipeline(config_path)?;
    let tool_versions = check_tools(&pipeline.config.tools).await?;

    let requested: Option<HashSet<TaskId>> = if args.tasks.is_empty() {
        None
    } else {
        Some(
            args.tasks
                .iter()
                .map(|s| TaskId::from_str(s))
                .collect::<Result<_, _>>()?,
        )
    };

    let backend = resolve_cluster_kind(None, &pipeline.config)
        .await?
        .map(backend_for);
    let live = live_jobs(backend.as_ref()).await.unwrap_or_default();
    let ping_timeout = pipeline_ping_timeout(&pipeline.config);
    let fscache = FsCache::new();
    let ping_touch_interval = Duration::from_secs(args.ping_touch_interval_secs);

    for task_id in pipeline.task_ids() {
        if let Some(requested) = &requested {
            if !requested.contains(&task_id) {
                continue;
            }
        }
        let state = task_state(&pipeline, &task_id, &fscache, &live, ping_timeout);
        if !state.is_ready() {
            continue;
        }

        println!("running {task_id}...");
        let outcome = run_cancellable(execute_task(
            &pipeline,
            &task_id,
            &fscache,
            &git_state,
            &tool_versions,
            ping_touch_interval,
        ))
        .await?;

        let Some(outcome) = outcome else {
            eprintln!("task {task_id} cancelled");
            return Ok(2);
        };

        match outcome {
            Ok(report) => {
                for output in &report.published_outputs {
                    println!("  published {}", output.display());
                }
            }
            Err(error) => {
                eprintln!("task {task_id} failed: {error}");
                return Ok(error.exit_code());
            }
        }
    }

    Ok(0)
}

fn pipeline_ping_timeout(config: &uap_config::Config) -> Duration {
    if config.ping_timeout_secs == 0 {
        DEFAULT_PING_TIMEOUT
    } else {
        Duration::from_secs(config.ping_timeout_secs)
    }
}

#[cfg(test)]
#[path = "run_locally_tests.rs"]
mod tests;
