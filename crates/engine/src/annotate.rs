// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-output-file YAML provenance sidecars. Written atomically: first to
//! `<outfile>.annotation.yaml.tmp`, then renamed into place, so a reader
//! never observes a half-written annotation.

use crate::fscache::FsCache;
use crate::git::GitState;
use crate::tools::ToolCheckInfo;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uap_config::Config;
use uap_core::id::RunId;

/// The full provenance record for one output file.
#[derive(Debug, Serialize)]
pub struct Annotation<'a> {
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub step_options: &'a serde_json::Value,
    pub run_id: &'a RunId,
    pub run_info: AnnotationRunInfo<'a>,
    pub config: &'a Config,
    pub tool_versions: &'a IndexMap<String, ToolCheckInfo>,
    pub git_hash_tag: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dirty_diff: Option<&'a str>,
}

/// The subset of a run's declared state that lets a later analyst
/// reconstruct `{step_name, run_id, options, inputs, outputs}` from the
/// annotation alone.
#[derive(Debug, Serialize)]
pub struct AnnotationRunInfo<'a> {
    pub step_name: &'a str,
    pub module_name: &'a str,
    pub inputs: &'a [PathBuf],
    pub outputs: Vec<&'a PathBuf>,
}

pub fn annotation_path(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".annotation.yaml");
    output_path.with_file_name(name)
}

/// Serialize `annotation`, write it to `<output_path>.annotation.yaml.tmp`,
/// then rename it into place. Invalidates both the tmp and final path in
/// `fscache` (the rename changes what `exists`/`mtime` report for the
/// final path, and the tmp path is gone).
pub async fn write_annotation(
    output_path: &Path,
    annotation: &Annotation<'_>,
    fscache: &FsCache,
) -> std::io::Result<()> {
    let final_path = annotation_path(output_path);
    let tmp_path = final_path.with_extension("yaml.tmp");

    let body = serde_yaml::to_string(annotation)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    tokio::fs::write(&tmp_path, body).await?;
    tokio::fs::rename(&tmp_path, &final_path).await?;

    fscache.invalidate(&tmp_path);
    fscache.invalidate(&final_path);
    Ok(())
}

/// Build the [`GitState`]-derived fields as owned strings so callers don't
/// need to juggle lifetimes across the `await` in [`write_annotation`].
pub struct GitFields {
    pub hash_tag: String,
    pub dirty_diff: Option<String>,
}

impl From<&GitState> for GitFields {
    fn from(state: &GitState) -> Self {
        Self {
            hash_tag: state.hash_tag.clone(),
            dirty_diff: state.dirty_diff.clone(),
        }
    }
}

#[cfg(test)]
#[path = "annotate_tests.rs"]
mod tests;
