// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local executor: runs one task end-to-end — prepare directories,
//! rewrite output paths into a scratch temp directory, start the run ping
//! (with a background touch ticker), materialize the run's exec-group
//! tree via `uap-exec`, publish outputs atomically on success, write
//! annotations, and clear the temp dir and run ping.

use crate::annotate::{annotation_path, Annotation, AnnotationRunInfo};
use crate::error::TaskError;
use crate::fscache::FsCache;
use crate::git::GitState;
use crate::pipeline::Pipeline;
use crate::ping::{remove_ping, run_ping_path, touch_run_ping, write_run_ping};
use crate::tools::ToolCheckInfo;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uap_core::exec_model::{Command, ExecGroup, ExecItem, Pipeline as ExecPipeline};
use uap_core::task::TaskId;
use uap_core::time_fmt::format_rfc3339;

/// The outputs a task published, for use by callers that want to report
/// or inspect them (e.g. the CLI's summary line).
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub published_outputs: Vec<PathBuf>,
}

/// Run `task_id` to completion. On success, every declared output exists
/// at its final path with a fresh annotation sidecar; on failure, no
/// output is published (partial temp-directory work is left behind only
/// if the best-effort cleanup itself fails) and the run ping remains in
/// place as a post-mortem. Dropping this future before it resolves — as
/// happens on a cancelling signal — leaves the same trail: nothing
/// published, ping untouched.
pub async fn execute_task(
    pipeline: &Pipeline,
    task_id: &TaskId,
    fscache: &FsCache,
    git_state: &GitState,
    tool_versions: &IndexMap<String, ToolCheckInfo>,
    ping_touch_interval: Duration,
) -> Result<ExecutionReport, TaskError> {
    let run = pipeline.run_for(task_id).ok_or_else(|| TaskError::Other {
        task_id: task_id.to_string(),
        message: "no such task in pipeline".to_string(),
    })?;
    let output_dir = pipeline
        .output_dir_for(&task_id.step_name)
        .ok_or_else(|| TaskError::Other {
            task_id: task_id.to_string(),
            message: "step has no output directory".to_string(),
        })?;
    let step = pipeline
        .step_for(&task_id.step_name)
        .ok_or_else(|| TaskError::Other {
            task_id: task_id.to_string(),
            message: "step missing from resolved graph".to_string(),
        })?;

    // 1. prepare directories
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| io_err(task_id, "create output directory", source))?;
    let temp_dir = unique_temp_dir(&pipeline.config.destination_path)
        .await
        .map_err(|source| io_err(task_id, "create temp directory", source))?;

    // 2. rewrite paths: every declared output moves into the temp dir for
    // the duration of execution, same basename.
    let mut rewrite: HashMap<PathBuf, PathBuf> = HashMap::new();
    for output in run.all_output_files() {
        #[allow(clippy::expect_used)]
        let basename = output
            .file_name()
            .expect("declared output paths always have a file name");
        rewrite.insert(output.clone(), temp_dir.join(basename));
    }
    let exec_groups: Vec<ExecGroup> = run
        .exec_groups
        .iter()
        .map(|group| rewrite_exec_group(group, &rewrite))
        .collect();

    tracing::info!(task_id = %task_id, temp_dir = %temp_dir.display(), "starting task");

    // 3. start run ping, with a background ticker touching its mtime.
    let start_time = format_rfc3339(std::time::SystemTime::now());
    write_run_ping(output_dir, &task_id.run_id, &start_time)
        .await
        .map_err(|source| io_err(task_id, "write run ping", source))?;
    fscache.invalidate(&run_ping_path(output_dir, &task_id.run_id));

    let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel::<()>();
    let ticker_output_dir = output_dir.to_path_buf();
    let ticker_run_id = task_id.run_id.clone();
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(ping_touch_interval);
        interval.tick().await; // first tick fires immediately; skip it
        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = interval.tick() => {
                    let _ = touch_run_ping(&ticker_output_dir, &ticker_run_id).await;
                }
            }
        }
    });

    // 4. materialize exec-groups.
    let exec_result = uap_exec::run_exec_groups(&exec_groups, &temp_dir).await;

    let _ = stop_tx.send(());
    let _ = ticker.await;

    if let Err(source) = exec_result {
        tracing::error!(task_id = %task_id, error = %source, "task failed, leaving run ping in place");
        // run ping stays in place on failure, per spec.
        return Err(TaskError::Exec {
            task_id: task_id.to_string(),
            source,
        });
    }

    // 5. publish outputs: temp -> final, only now that every group
    // succeeded.
    let mut published = Vec::with_capacity(rewrite.len());
    for (final_path, temp_path) in &rewrite {
        tokio::fs::rename(temp_path, final_path)
            .await
            .map_err(|source| io_err(task_id, "publish output", source))?;
        fscache.invalidate(final_path);
        fscache.invalidate(temp_path);
        published.push(final_path.clone());
    }

    // 6. write annotations.
    let end_time = format_rfc3339(std::time::SystemTime::now());
    let inputs = run.all_input_files();
    let owned_inputs: Vec<PathBuf> = inputs.into_iter().cloned().collect();
    let outputs: Vec<&PathBuf> = published.iter().collect();
    let annotation = Annotation {
        start_time: &start_time,
        end_time: &end_time,
        step_options: &step.options,
        run_id: &task_id.run_id,
        run_info: AnnotationRunInfo {
            step_name: task_id.step_name.as_str(),
            module_name: step.module_name.as_str(),
            inputs: &owned_inputs,
            outputs,
        },
        config: &pipeline.config,
        tool_versions,
        git_hash_tag: &git_state.hash_tag,
        git_dirty_diff: git_state.dirty_diff.as_deref(),
    };
    for output in &published {
        crate::annotate::write_annotation(output, &annotation, fscache)
            .await
            .map_err(|source| io_err(task_id, "write annotation", source))?;
        fscache.invalidate(&annotation_path(output));
    }

    // 7. remove temp dir, best-effort.
    let _ = tokio::fs::remove_dir(&temp_dir).await;

    // 8. clear pings.
    let run_path = run_ping_path(output_dir, &task_id.run_id);
    remove_ping(&run_path)
        .await
        .map_err(|source| io_err(task_id, "remove run ping", source))?;
    fscache.invalidate(&run_path);

    tracing::info!(task_id = %task_id, outputs = published.len(), "task finished");

    Ok(ExecutionReport {
        published_outputs: published,
    })
}

fn io_err(task_id: &TaskId, phase: &str, source: std::io::Error) -> TaskError {
    TaskError::Other {
        task_id: task_id.to_string(),
        message: format!("{phase}: {source}"),
    }
}

/// Create `<destination>/temp/temp-<8 random lowercase-alnum chars>` — one
/// shared scratch root under the pipeline's destination directory.
async fn unique_temp_dir(destination: &Path) -> std::io::Result<PathBuf> {
    let temp_root = destination.join("temp");
    tokio::fs::create_dir_all(&temp_root).await?;
    loop {
        let token = random_token(8);
        let candidate = temp_root.join(format!("temp-{token}"));
        match tokio::fs::create_dir(&candidate).await {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
}

/// 8 random lowercase-alphanumeric characters, taken from a fresh
/// [`uuid::Uuid::new_v4`] (already a workspace dependency via
/// `uap-engine::declare`) rather than adding a dedicated RNG dependency.
fn random_token(len: usize) -> String {
    uuid::Uuid::new_v4().simple().to_string()[..len].to_string()
}

fn rewrite_path(path: &Path, rewrite: &HashMap<PathBuf, PathBuf>) -> PathBuf {
    rewrite.get(path).cloned().unwrap_or_else(|| path.to_path_buf())
}

fn rewrite_command(command: &Command, rewrite: &HashMap<PathBuf, PathBuf>) -> Command {
    Command {
        argv: command
            .argv
            .iter()
            .map(|arg| {
                let as_path = PathBuf::from(arg);
                match rewrite.get(&as_path) {
                    Some(mapped) => mapped.to_string_lossy().to_string(),
                    None => arg.clone(),
                }
            })
            .collect(),
        stdin: command.stdin.as_ref().map(|p| rewrite_path(p, rewrite)),
        stdout: command.stdout.as_ref().map(|p| rewrite_path(p, rewrite)),
        stderr: command.stderr.as_ref().map(|p| rewrite_path(p, rewrite)),
    }
}

fn rewrite_pipeline(pipeline: &ExecPipeline, rewrite: &HashMap<PathBuf, PathBuf>) -> ExecPipeline {
    ExecPipeline {
        commands: pipeline
            .commands
            .iter()
            .map(|c| rewrite_command(c, rewrite))
            .collect(),
    }
}

fn rewrite_exec_group(group: &ExecGroup, rewrite: &HashMap<PathBuf, PathBuf>) -> ExecGroup {
    ExecGroup {
        items: group
            .items
            .iter()
            .map(|item| match item {
                ExecItem::Command(c) => ExecItem::Command(rewrite_command(c, rewrite)),
                ExecItem::Pipeline(p) => ExecItem::Pipeline(rewrite_pipeline(p, rewrite)),
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
