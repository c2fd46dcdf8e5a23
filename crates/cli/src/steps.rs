// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A minimal demo step library so the `uap` binary has something to run.
//! The real step library (bowtie2, fastqc, and friends) is out of scope
//! for this engine; these two adapters exist only so `run-locally` and
//! `submit-to-cluster` have runnable work, not as a production step set.
//!
//! - `source`: copies each path under `options.files` into the step's own
//!   output directory, one run per file, run id = file stem.
//! - `shell`: one run named `main` that runs `options.command` (a shell
//!   one-liner) with `{inputs}` replaced by the space-joined assembled
//!   input paths and `{output}` replaced by the absolute path of the
//!   declared output file named `options.output`.

use uap_core::exec_model::Command;
use uap_engine::adapter::StepAdapter;
use uap_engine::declare::{DeclareCtx, DeclareError};
use uap_engine::StepRegistry;

pub struct SourceAdapter;

impl StepAdapter for SourceAdapter {
    fn declare(&self, ctx: &mut DeclareCtx<'_>) -> Result<(), DeclareError> {
        let files: Vec<String> = ctx
            .options
            .get("files")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        for source in &files {
            let basename = std::path::Path::new(source)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| source.clone());
            let run_id = std::path::Path::new(&basename)
                .file_stem()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| basename.clone());

            let mut handle = ctx.declare_run(run_id.into());
            let output = handle.add_output_file("out/file", &basename, &[])?;
            handle
                .new_exec_group()
                .add_command(Command::new(["cp", source, &output.to_string_lossy()]));
            handle.finish();
        }
        Ok(())
    }
}

pub struct ShellAdapter;

impl StepAdapter for ShellAdapter {
    fn declare(&self, ctx: &mut DeclareCtx<'_>) -> Result<(), DeclareError> {
        let command_template = ctx
            .options
            .get("command")
            .and_then(|v| v.as_str())
            .unwrap_or("true")
            .to_string();
        let output_name = ctx
            .options
            .get("output")
            .and_then(|v| v.as_str())
            .unwrap_or("output.txt")
            .to_string();

        let run_ids: Vec<_> = ctx.known_run_ids().cloned().collect();
        let run_ids = if run_ids.is_empty() {
            vec![uap_core::id::RunId::new("main")]
        } else {
            run_ids
        };

        for run_id in run_ids {
            let mut inputs = Vec::new();
            for tag in ["in/main", "out/file"] {
                inputs.extend(
                    ctx.inputs_for(&run_id, &uap_core::id::ConnectionTag::new(tag))
                        .to_vec(),
                );
            }
            let inputs_joined = inputs
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect::<Vec<_>>()
                .join(" ");

            let mut handle = ctx.declare_run(run_id);
            let output = handle.add_output_file("out/result", &output_name, &inputs)?;
            let rendered = command_template
                .replace("{inputs}", &inputs_joined)
                .replace("{output}", &output.to_string_lossy());
            handle
                .new_exec_group()
                .add_command(Command::new(["sh", "-c", &rendered]));
            handle.finish();
        }
        Ok(())
    }
}

pub fn demo_registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    registry.register("source", || Box::new(SourceAdapter));
    registry.register("shell", || Box::new(ShellAdapter));
    registry
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
