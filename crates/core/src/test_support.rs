// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures for use across crates. Gated behind
//! `#[cfg(any(test, feature = "test-support"))]`.

use crate::exec_model::{Command, ExecGroup};
use crate::id::{ConnectionTag, ModuleName, RunId, StepName};
use crate::run::Run;
use crate::step::Step;
use std::path::PathBuf;

/// A minimal source step (no dependencies) named `step_name`.
pub fn source_step(step_name: &str, module_name: &str) -> Step {
    Step {
        step_name: StepName::new(step_name),
        module_name: ModuleName::new(module_name),
        options: serde_json::json!({}),
        dependencies: Vec::new(),
        required_tools: Vec::new(),
        cores: 1,
    }
}

/// A step depending on the given parents.
pub fn dependent_step(step_name: &str, module_name: &str, deps: &[&str]) -> Step {
    Step {
        step_name: StepName::new(step_name),
        module_name: ModuleName::new(module_name),
        options: serde_json::json!({}),
        dependencies: deps.iter().map(|d| StepName::new(*d)).collect(),
        required_tools: Vec::new(),
        cores: 1,
    }
}

/// A run that declares one output file on `tag`, fed by `inputs`, produced
/// by a single trivial `touch`-style command.
pub fn run_with_one_output(
    run_id: &str,
    tag: &str,
    output_path: impl Into<PathBuf>,
    inputs: &[&str],
) -> Run {
    let mut run = Run::new(RunId::new(run_id));
    let output_path = output_path.into();
    let inputs: Vec<PathBuf> = inputs.iter().map(PathBuf::from).collect();
    let mut outputs = indexmap::IndexMap::new();
    outputs.insert(output_path.clone(), inputs);
    run.output_files.insert(ConnectionTag::new(tag), outputs);
    let mut group = ExecGroup::new();
    group.add_command(Command::new(["touch", &output_path.to_string_lossy()]));
    run.exec_groups.push(group);
    run
}
