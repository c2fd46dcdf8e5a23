// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `volatilize`: free disk space held by intermediate outputs that are
//! safe to recompute later. An output is a *volatilization candidate*
//! when at least one downstream task declared it as an input and the
//! file still exists on disk; final (leaf) outputs are never candidates
//! since nothing downstream could ever trigger their recomputation.
//!
//! The report/act split and the placeholder format below are this
//! crate's own design, recorded in `DESIGN.md`.

use crate::fscache::FsCache;
use crate::pipeline::Pipeline;
use std::path::PathBuf;
use uap_core::time_fmt::format_rfc3339;

/// One output file eligible to be volatilized.
#[derive(Debug, Clone)]
pub struct VolatilizeCandidate {
    pub task_id: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Every existing output that has at least one downstream consumer.
/// Terminal outputs (nothing reads them) are never included: volatilizing
/// them would destroy data the pipeline can't recompute.
pub fn find_candidates(pipeline: &Pipeline) -> Vec<VolatilizeCandidate> {
    let mut candidates = Vec::new();
    for task_id in pipeline.task_ids() {
        let Some(run) = pipeline.run_for(&task_id) else {
            continue;
        };
        for output in run.all_output_files() {
            if !pipeline.task_ids_for_input_file.contains_key(output) {
                continue;
            }
            let Ok(metadata) = std::fs::metadata(output) else {
                continue;
            };
            candidates.push(VolatilizeCandidate {
                task_id: task_id.to_string(),
                path: output.clone(),
                size_bytes: metadata.len(),
            });
        }
    }
    candidates
}

/// Overwrite every candidate's content with a short placeholder recording
/// what used to be there and when it was cleared, then invalidate the
/// cache entries so later stat-based state checks see the new (zero-ish)
/// size. The file's path and mtime-derived "exists" signal are preserved
/// deliberately: a task's output-completeness check only asks whether the
/// path exists, so volatilizing never makes a finished task look
/// unfinished.
pub async fn volatilize(candidates: &[VolatilizeCandidate], fscache: &FsCache) -> std::io::Result<()> {
    let cleared_at = format_rfc3339(std::time::SystemTime::now());
    for candidate in candidates {
        let placeholder = format!(
            "# volatilized {}\n# original size: {} bytes\n# cleared at: {}\n",
            candidate.path.display(),
            candidate.size_bytes,
            cleared_at,
        );
        tokio::fs::write(&candidate.path, placeholder).await?;
        fscache.invalidate(&candidate.path);
    }
    Ok(())
}

#[cfg(test)]
#[path = "volatilize_tests.rs"]
mod tests;
