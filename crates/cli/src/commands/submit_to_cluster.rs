// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uap submit-to-cluster [TASK...]` — submit every non-FINISHED task to
//! the batch system in topological order, each depending on the job ids
//! of its upstream tasks that aren't already FINISHED.

use anyhow::{Context, Result};
use clap::Args;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;
use uap_core::task::TaskId;
use uap_core::time_fmt::format_rfc3339;
use uap_engine::cluster::submit_task;
use uap_engine::state_engine::task_state;
use uap_engine::FsCache;

use super::common::{capture_git_state_or_refuse, live_jobs, resolve_cluster_kind};

#[derive(Args)]
pub struct SubmitToClusterArgs {
    /// Restrict submission to these task ids; submits every non-FINISHED
    /// task if omitted.
    pub tasks: Vec<String>,

    /// Cluster backend to target; `auto` autodetects via the same probe
    /// `uap status` uses.
    #[arg(long, default_value = "auto")]
    pub cluster: String,

    /// Proceed even if the repository's working tree is dirty.
    #[arg(long = "even-if-dirty")]
    pub even_if_dirty: bool,
}

pub async fn run(args: SubmitToClusterArgs, config_path: &Path) -> Result<i32> {
    capture_git_state_or_refuse(config_path, args.even_if_dirty).await?;
    let pipeline = super::common::load_pipeline(config_path)?;

    let cluster_flag = if args.cluster == "auto" { None } else { Some(args.cluster.as_str()) };
    let kind = resolve_cluster_kind(cluster_flag, &pipeline.config)
        .await?
        .context("could not determine a cluster backend; pass --cluster or set `cluster` in the config")?;
    let backend = uap_engine::backend_for(kind);
    let live = live_jobs(Some(&backend)).await.unwrap_or_default();

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

    let fscache = FsCache::new();
    let ping_timeout = std::time::Duration::from_secs(pipeline.config.ping_timeout_secs);
    let mut job_ids: HashMap<TaskId, String> = HashMap::new();

    for task_id in pipeline.task_ids() {
        if let Some(requested) = &requested {
            if !requested.contains(&task_id) {
                continue;
            }
        }
        let state = task_state(&pipeline, &task_id, &fscache, &live, ping_timeout);
        if state.is_finished() {
            continue;
        }

        let Some(output_dir) = pipeline.output_dir_for(&task_id.step_name) else {
            continue;
        };
        let Some(step) = pipeline.step_for(&task_id.step_name) else {
            continue;
        };

        let mut parent_job_ids = Vec::new();
        for upstream in upstream_tasks(&pipeline, &task_id) {
            if let Some(job_id) = job_ids.get(&upstream) {
                parent_job_ids.push(job_id.clone());
            }
        }

        let run_command = format!(
            "uap --config {} --run-this {task_id}",
            config_path.display()
        );
        let submit_time = format_rfc3339(std::time::SystemTime::now());

        let job_id = submit_task(
            &backend,
            &task_id,
            step.cores,
            &pipeline.config.email,
            &run_command,
            &parent_job_ids,
            output_dir,
            &submit_time,
        )
        .await
        .with_context(|| format!("submitting {task_id}"))?;

        println!("submitted {task_id} as job {job_id}");
        job_ids.insert(task_id, job_id);
    }

    Ok(0)
}

/// The tasks whose outputs feed `task_id`'s inputs (the inverse of
/// [`uap_engine::Pipeline::downstream_of`]), used to compute which parent
/// job ids to depend on.
fn upstream_tasks(pipeline: &uap_engine::Pipeline, task_id: &TaskId) -> Vec<TaskId> {
    let Some(run) = pipeline.run_for(task_id) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for input in run.all_input_files() {
        if let Some(parent) = pipeline.task_id_for_output_file.get(input) {
            if seen.insert(parent.clone()) {
                out.push(parent.clone());
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "submit_to_cluster_tests.rs"]
mod tests;
