// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster submitter: renders a submit script from a per-backend
//! template, submits it with an `afterany`-style dependency expression on
//! the job ids of upstream tasks, parses the resulting job id out of the
//! submit command's stdout, and writes the queued ping.

use crate::ping::write_queued_ping;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use uap_core::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKind {
    Slurm,
    Sge,
    Uge,
}

impl FromStr for ClusterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slurm" => Ok(ClusterKind::Slurm),
            "sge" => Ok(ClusterKind::Sge),
            "uge" => Ok(ClusterKind::Uge),
            other => Err(format!("unknown cluster type {other:?}")),
        }
    }
}

impl ClusterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterKind::Slurm => "slurm",
            ClusterKind::Sge => "sge",
            ClusterKind::Uge => "uge",
        }
    }
}

/// Per-backend configuration table.
pub struct ClusterBackend {
    pub submit: &'static str,
    pub stat: &'static str,
    /// Default submit-script template, embedded directly here rather than
    /// read off an external asset path, since the step library those
    /// templates serve is itself out of scope (see `DESIGN.md`).
    pub template: &'static str,
    /// Dependency expression; if it contains `%s`, the comma-joined parent
    /// job ids are substituted into one argv token, otherwise the flag and
    /// the joined ids are passed as two separate argv tokens.
    pub hold_jid: &'static str,
    pub set_job_name: &'static str,
    pub set_stderr: &'static str,
    pub set_stdout: &'static str,
    pub parse_job_id: &'static str,
}

pub fn backend_for(kind: ClusterKind) -> ClusterBackend {
    match kind {
        ClusterKind::Slurm => ClusterBackend {
            submit: "sbatch",
            stat: "squeue",
            template: DEFAULT_TEMPLATE,
            hold_jid: "--dependency=afterany:%s",
            set_job_name: "--job-name=%s",
            set_stderr: "-e",
            set_stdout: "-o",
            parse_job_id: r"Submitted batch job (\d+)",
        },
        ClusterKind::Sge => ClusterBackend {
            submit: "qsub",
            stat: "qstat",
            template: DEFAULT_TEMPLATE,
            hold_jid: "-hold_jid",
            set_job_name: "-N",
            set_stderr: "-e",
            set_stdout: "-o",
            parse_job_id: r"Your job (\d+)",
        },
        ClusterKind::Uge => ClusterBackend {
            submit: "qsub",
            stat: "qstat",
            template: DEFAULT_TEMPLATE,
            hold_jid: "-hold_jid",
            set_job_name: "-N",
            set_stderr: "-e",
            set_stdout: "-o",
            parse_job_id: r"Your job (\d+)",
        },
    }
}

const DEFAULT_TEMPLATE: &str = "#!/bin/bash\n#{COMMAND}\n";

/// Substitute `#{CORES}`, `#{EMAIL}`, `#{COMMAND}` into `template` by flat
/// string replacement — the placeholders are fixed-format, no templating
/// engine is needed.
pub fn render_template(template: &str, cores: u32, email: &str, command: &str) -> String {
    template
        .replace("#{CORES}", &cores.to_string())
        .replace("#{EMAIL}", email)
        .replace("#{COMMAND}", command)
}

/// A cluster-command-line-argument: if `format` contains `%s`, return the
/// one substituted token; otherwise return `[format, value]` as two
/// tokens.
fn ccla(format: &str, value: &str) -> Vec<String> {
    if format.contains("%s") {
        vec![format.replace("%s", value)]
    } else {
        vec![format.to_string(), value.to_string()]
    }
}

/// Extract the job id from a submit command's captured stdout using the
/// backend's `parse_job_id` regex (one capture group).
pub fn parse_job_id(backend: &ClusterBackend, stdout: &str) -> Option<String> {
    let re = Regex::new(backend.parse_job_id).ok()?;
    re.captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// A short, `qsub -N`-safe job name derived from a task id: first letter of
/// every path component but the last, joined by `_`, truncated to 15
/// characters.
pub fn short_task_id(task_id: &TaskId) -> String {
    let full = task_id.to_string();
    let mut parts: Vec<String> = full.split('/').map(str::to_string).collect();
    let last = parts.len().saturating_sub(1);
    for part in parts.iter_mut().take(last) {
        if let Some(first) = part.chars().next() {
            *part = first.to_string();
        }
    }
    let joined = parts.join("_");
    joined.chars().take(15).collect()
}

/// Autodetect the cluster type by probing `sbatch --version` and
/// `qstat -help`'s leading bytes.
pub async fn autodetect() -> Option<ClusterKind> {
    if let Ok(output) = Command::new("sbatch").arg("--version").output().await {
        if output.stdout.starts_with(b"slurm ") {
            return Some(ClusterKind::Slurm);
        }
    }
    if let Ok(output) = Command::new("qstat").arg("-help").output().await {
        if output.stdout.starts_with(b"SGE ") {
            return Some(ClusterKind::Sge);
        }
        if output.stdout.starts_with(b"UGE ") {
            return Some(ClusterKind::Uge);
        }
    }
    None
}

/// The set of job ids the batch queue currently reports as live: the
/// first whitespace-delimited token of every line that parses as an
/// integer is a job id. Returns `None` (rather than an empty set) if the
/// `stat` binary itself is missing or fails to run at all, so callers can
/// distinguish "no jobs running" from "can't check the queue".
pub async fn live_jobs(backend: &ClusterBackend) -> Option<HashSet<String>> {
    let output = Command::new(backend.stat).output().await.ok()?;
    Some(parse_live_job_ids(&String::from_utf8_lossy(&output.stdout)))
}

fn parse_live_job_ids(stat_output: &str) -> HashSet<String> {
    stat_output
        .lines()
        .filter_map(|line| line.trim().split(' ').next())
        .filter(|token| token.parse::<u64>().is_ok())
        .map(str::to_string)
        .collect()
}

#[derive(Debug)]
pub enum SubmitError {
    Spawn(std::io::Error),
    NoJobIdInOutput(String),
    Stdin(std::io::Error),
    PingWrite(std::io::Error),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Spawn(e) => write!(f, "failed to spawn submit command: {e}"),
            SubmitError::NoJobIdInOutput(out) => {
                write!(f, "could not parse a job id from submit output: {out:?}")
            }
            SubmitError::Stdin(e) => write!(f, "failed to write submit script to stdin: {e}"),
            SubmitError::PingWrite(e) => write!(f, "failed to write queued ping: {e}"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Submit `task_id` to the cluster backend, depending on `parent_job_ids`
/// (empty when every input is already FINISHED), write the queued ping in
/// `output_dir`, and return the parsed job id.
#[allow(clippy::too_many_arguments)]
pub async fn submit_task(
    backend: &ClusterBackend,
    task_id: &TaskId,
    cores: u32,
    email: &str,
    run_command: &str,
    parent_job_ids: &[String],
    output_dir: &Path,
    submit_time: &str,
) -> Result<String, SubmitError> {
    let script = render_template(backend.template, cores, email, run_command);

    let mut argv: Vec<String> = ccla(backend.set_job_name, &short_task_id(task_id));
    if !parent_job_ids.is_empty() {
        argv.extend(ccla(backend.hold_jid, &parent_job_ids.join(",")));
    }

    let mut command = Command::new(backend.submit);
    command.args(&argv);
    command.stdin(std::process::Stdio::piped());
    command.stdout(std::process::Stdio::piped());
    command.stderr(std::process::Stdio::piped());

    let mut child = command.spawn().map_err(SubmitError::Spawn)?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(script.as_bytes())
            .await
            .map_err(SubmitError::Stdin)?;
    }
    let output = child.wait_with_output().await.map_err(SubmitError::Spawn)?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();

    let job_id = parse_job_id(backend, &stdout).ok_or_else(|| {
        tracing::error!(task_id = %task_id, stdout = %stdout, "submit command produced no parseable job id");
        SubmitError::NoJobIdInOutput(stdout.clone())
    })?;

    write_queued_ping(output_dir, &task_id.run_id, &job_id, submit_time)
        .await
        .map_err(SubmitError::PingWrite)?;

    tracing::info!(task_id = %task_id, job_id = %job_id, depends_on = ?parent_job_ids, "submitted task to cluster");

    Ok(job_id)
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
