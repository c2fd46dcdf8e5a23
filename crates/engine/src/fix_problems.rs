// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fix-problems`: scan every task for a stale run ping (one that outlived
//! the configured ping timeout with no live job behind it) or a stale
//! queued ping (one whose `job_id` is absent from the cluster's live-jobs
//! set), report them, and optionally delete them. A queued ping whose job
//! id is still live is never removed, even under `--srsly`; and when the
//! cluster's live-jobs set can't be determined at all (the queue can't be
//! probed), queued pings are left unevaluated entirely rather than assumed
//! stale.

use crate::error::{StaleKind, StaleState};
use crate::ping::{ping_age, queued_ping_path, run_ping_path, QueuedPing};
use crate::pipeline::Pipeline;
use std::collections::HashSet;
use std::time::{Duration, SystemTime};

/// Scan every task in `pipeline` for stale pings. `live_jobs` is the set
/// of job ids the cluster currently reports as running, or `None` if that
/// set could not be determined (the queue's `stat` tool failed or isn't
/// available) — in which case queued pings are skipped entirely rather
/// than reported stale, since there is no way to tell live from stale
/// without it.
pub fn find_stale_pings(
    pipeline: &Pipeline,
    live_jobs: Option<&HashSet<String>>,
    ping_timeout: Duration,
    now: SystemTime,
) -> Vec<StaleState> {
    let mut problems = Vec::new();

    for task_id in pipeline.task_ids() {
        let Some(output_dir) = pipeline.output_dir_for(&task_id.step_name) else {
            continue;
        };

        let run_path = run_ping_path(output_dir, &task_id.run_id);
        if let Some(age) = ping_age(&run_path, now) {
            if age > ping_timeout {
                tracing::warn!(task_id = %task_id, age_secs = age.as_secs(), "stale run ping");
                problems.push(StaleState {
                    task_id: task_id.to_string(),
                    kind: StaleKind::StaleRunPing,
                    ping_path: run_path,
                });
            }
        }

        let Some(live_jobs) = live_jobs else {
            continue;
        };
        let queued_path = queued_ping_path(output_dir, &task_id.run_id);
        if queued_path.exists() {
            if let Ok(text) = std::fs::read_to_string(&queued_path) {
                if let Ok(ping) = serde_yaml::from_str::<QueuedPing>(&text) {
                    if !live_jobs.contains(&ping.job_id) {
                        problems.push(StaleState {
                            task_id: task_id.to_string(),
                            kind: StaleKind::StaleQueuedPing,
                            ping_path: queued_path,
                        });
                    }
                }
            }
        }
    }

    problems
}

/// Delete every reported ping file (`fix-problems --srsly`). Absence of a
/// file by the time this runs is not an error (another process may have
/// already cleared it).
pub async fn remove_stale_pings(problems: &[StaleState]) -> std::io::Result<()> {
    for problem in problems {
        crate::ping::remove_ping(&problem.ping_path).await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "fix_problems_tests.rs"]
mod tests;
