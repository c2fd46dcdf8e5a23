// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uap --run-this <TASK_ID>` — execute exactly one task, no readiness
//! filtering. This is the command a cluster job script runs; by the time
//! the batch system starts it, the task's dependencies have already
//! finished. A SIGTERM or SIGINT received while the task is running
//! cancels it and kills its child process via `kill_on_drop`.

use anyhow::Result;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use uap_core::task::TaskId;
use uap_engine::{execute_task, tools::check_tools, FsCache};

use super::common::run_cancellable;

pub async fn run(task_id: &str, config_path: &Path, even_if_dirty: bool) -> Result<i32> {
    let task_id = TaskId::from_str(task_id)?;
    let git_state = super::common::capture_git_state_or_refuse(config_path, even_if_dirty).await?;
    let pipeline = super::common::load_pipeline(config_path)?;
    let tool_versions = check_tools(&pipeline.config.tools).await?;

    if pipeline.step_for(&task_id.step_name).is_none() {
        anyhow::bail!("no such step {:?}", task_id.step_name.as_str());
    }

    let fscache = FsCache::new();
    let ping_touch_interval = Duration::from_secs(60);

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
                println!("published {}", output.display());
            }
            Ok(0)
        }
        Err(error) => {
            eprintln!("task {task_id} failed: {error}");
            Ok(error.exit_code())
        }
    }
}

#[cfg(test)]
#[path = "run_this_tests.rs"]
mod tests;
