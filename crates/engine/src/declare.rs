// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The run declaration API: the contract between the engine and a step
//! adapter. `DeclareCtx::declare_run` returns a scoped [`RunHandle`] whose
//! `finish()` registers the declared run; dropping the handle without
//! calling `finish()` discards the partial declaration.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uap_core::exec_model::ExecGroup;
use uap_core::id::{ConnectionTag, RunId};
use uap_core::run::Run;

#[derive(Debug, Error)]
pub enum DeclareError {
    #[error("run {run_id:?} declares duplicate output basename {basename:?}")]
    DuplicateBasenameInRun { run_id: String, basename: String },
    #[error("run {0:?} was declared more than once")]
    DuplicateRun(String),
}

/// Mapping from run id to connection tag to the input file paths feeding
/// that connection, assembled by the engine from parent steps' outputs
/// before invoking the adapter.
pub type RunInputs = IndexMap<RunId, IndexMap<ConnectionTag, Vec<PathBuf>>>;

/// Context object handed to a [`crate::adapter::StepAdapter`]. Carries the
/// step's options, its output directory, a scratch temp root, and the
/// assembled input mapping; accumulates declared [`Run`]s.
pub struct DeclareCtx<'a> {
    pub options: &'a serde_json::Value,
    output_dir: &'a Path,
    temp_root: &'a Path,
    inputs: &'a RunInputs,
    declared: Vec<Run>,
}

impl<'a> DeclareCtx<'a> {
    pub fn new(options: &'a serde_json::Value, output_dir: &'a Path, temp_root: &'a Path, inputs: &'a RunInputs) -> Self {
        Self {
            options,
            output_dir,
            temp_root,
            inputs,
            declared: Vec::new(),
        }
    }

    /// Every run id this step has inputs for (including runs with no
    /// connections, i.e. a source step's self-chosen run ids — the
    /// adapter is free to declare runs with ids absent from `inputs` too).
    pub fn known_run_ids(&self) -> impl Iterator<Item = &RunId> {
        self.inputs.keys()
    }

    /// Input files declared for `run_id` on `tag`; empty if the connection
    /// was never wired or was declared empty upstream.
    pub fn inputs_for(&self, run_id: &RunId, tag: &ConnectionTag) -> &[PathBuf] {
        self.inputs
            .get(run_id)
            .and_then(|by_tag| by_tag.get(tag))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The step's output directory (paths returned by
    /// [`RunHandle::add_output_file`] are rooted here).
    pub fn output_dir(&self) -> &Path {
        self.output_dir
    }

    /// Begin declaring a run. The run is registered only if the returned
    /// handle's [`RunHandle::finish`] is called.
    pub fn declare_run(&mut self, run_id: RunId) -> RunHandle<'_, 'a> {
        RunHandle {
            ctx: self,
            run: Some(Run::new(run_id)),
        }
    }

    pub(crate) fn into_runs(self) -> Vec<Run> {
        self.declared
    }
}

/// Scoped builder for a single [`Run`]. Every mutator takes `&mut self` and
/// returns values needed immediately (e.g. the absolute output path);
/// nothing is visible to the rest of the pipeline until [`finish`] is
/// called.
///
/// [`finish`]: RunHandle::finish
pub struct RunHandle<'ctx, 'a> {
    ctx: &'ctx mut DeclareCtx<'a>,
    run: Option<Run>,
}

impl RunHandle<'_, '_> {
    fn run_mut(&mut self) -> &mut Run {
        #[allow(clippy::expect_used)]
        self.run.as_mut().expect("RunHandle used after finish()")
    }

    /// Register an output file on `tag` with basename `basename`, fed by
    /// `input_paths`. Returns the absolute output path (inside the step's
    /// output directory). Fails if `basename` was already used by this run.
    pub fn add_output_file(
        &mut self,
        tag: impl Into<ConnectionTag>,
        basename: &str,
        input_paths: &[PathBuf],
    ) -> Result<PathBuf, DeclareError> {
        let output_dir = self.ctx.output_dir.to_path_buf();
        let path = output_dir.join(basename);
        let run_id = self.run_mut().run_id.to_string();

        let already_used = self
            .run_mut()
            .output_files
            .values()
            .any(|m| m.contains_key(&path));
        if already_used {
            return Err(DeclareError::DuplicateBasenameInRun {
                run_id,
                basename: basename.to_string(),
            });
        }

        self.run_mut()
            .output_files
            .entry(tag.into())
            .or_default()
            .insert(path.clone(), input_paths.to_vec());
        Ok(path)
    }

    /// Declare an output connection tag intentionally empty.
    pub fn add_empty_output_connection(&mut self, tag: impl Into<ConnectionTag>) {
        self.run_mut().empty_connections.push(tag.into());
    }

    /// A unique path in the per-task temp root, not created yet.
    pub fn add_temporary_file(&mut self, hint: &str) -> PathBuf {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let path = self.ctx.temp_root.join(format!("{hint}-{}", &token[..8]));
        self.run_mut().temporary_files.push(path.clone());
        path
    }

    /// A unique directory path in the per-task temp root, not created yet.
    pub fn add_temporary_directory(&mut self, hint: &str) -> PathBuf {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let path = self.ctx.temp_root.join(format!("{hint}-{}", &token[..8]));
        self.run_mut().temporary_directories.push(path.clone());
        path
    }

    /// Append a new, empty [`ExecGroup`] to this run and return a mutable
    /// handle to it.
    pub fn new_exec_group(&mut self) -> &mut ExecGroup {
        self.run_mut().exec_groups.push(ExecGroup::new());
        #[allow(clippy::expect_used)]
        self.run_mut()
            .exec_groups
            .last_mut()
            .expect("just pushed")
    }

    /// Adapter scratch space, opaque to the engine.
    pub fn set_private_info(&mut self, value: serde_json::Value) {
        self.run_mut().private_info = value;
    }

    /// Commit this run to the owning [`DeclareCtx`].
    pub fn finish(mut self) {
        if let Some(run) = self.run.take() {
            self.ctx.declared.push(run);
        }
    }
}

#[cfg(test)]
#[path = "declare_tests.rs"]
mod tests;
