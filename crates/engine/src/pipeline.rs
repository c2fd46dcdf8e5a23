// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine's own `Pipeline` value: an explicit value threaded through
//! all components rather than a module-level mutable singleton. Built
//! once per invocation from a [`Config`] and a [`StepRegistry`];
//! read-only thereafter.

use crate::adapter::StepRegistry;
use crate::declare::{DeclareCtx, RunInputs};
use crate::error::PipelineBuildError;
use crate::fs_layout::output_dir_for_step;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;
use uap_config::{build_step_graph, Config};
use uap_core::id::{ConnectionTag, StepName};
use uap_core::run::Run;
use uap_core::step::Step;
use uap_core::task::TaskId;

/// The fully expanded pipeline: the topologically ordered step graph, the
/// runs declared by every step's adapter, and the derived maps the task
/// engine and executor consult.
pub struct Pipeline {
    pub config: Config,
    pub steps: Vec<Step>,
    pub runs: IndexMap<StepName, Vec<Run>>,
    pub output_dirs: HashMap<StepName, PathBuf>,
    /// Which task produced a given output file; every output is produced
    /// by exactly one task by construction.
    pub task_id_for_output_file: HashMap<PathBuf, TaskId>,
    /// Which tasks declared a given path as an input (reverse of
    /// `file_dependencies`, used to find downstream consumers of a file).
    pub task_ids_for_input_file: HashMap<PathBuf, Vec<TaskId>>,
    /// output path -> input paths it depends on.
    pub file_dependencies: HashMap<PathBuf, Vec<PathBuf>>,
}

impl Pipeline {
    /// Build the full pipeline: expand the step graph, invoke every step's
    /// adapter in topological order, and assemble the cross-task maps.
    /// `test_run` selects the `test/`-prefixed output directory layout.
    pub fn build(
        config: Config,
        registry: &StepRegistry,
        test_run: bool,
    ) -> Result<Self, PipelineBuildError> {
        let steps = build_step_graph(&config)?;
        let mut runs: IndexMap<StepName, Vec<Run>> = IndexMap::new();
        let mut output_dirs = HashMap::new();
        let mut task_id_for_output_file = HashMap::new();
        let mut task_ids_for_input_file: HashMap<PathBuf, Vec<TaskId>> = HashMap::new();
        let mut file_dependencies = HashMap::new();
        let mut resolved_steps = Vec::with_capacity(steps.len());

        for mut step in steps {
            let adapter = registry.create(&step.module_name).ok_or_else(|| {
                PipelineBuildError::UnknownModule(
                    step.step_name.to_string(),
                    step.module_name.to_string(),
                )
            })?;

            for tool in adapter.required_tools() {
                if !config.tools.contains_key(*tool) {
                    return Err(PipelineBuildError::MissingTool {
                        step: step.step_name.to_string(),
                        tool: tool.to_string(),
                    });
                }
            }
            step.required_tools = adapter.required_tools().iter().map(|s| s.to_string()).collect();
            step.cores = adapter.cores();

            let output_dir = output_dir_for_step(&config.destination_path, &resolved_steps_plus(&resolved_steps, &step), &step.step_name.to_string(), test_run)
                .unwrap_or_else(|| config.destination_path.join(step.step_name.to_string()));
            let temp_root = config
                .destination_path
                .join("temp")
                .join(format!("declare-{}", step.step_name));

            let inputs = assemble_inputs(&step, &runs);

            let mut ctx = DeclareCtx::new(&step.options, &output_dir, &temp_root, &inputs);
            adapter
                .declare(&mut ctx)
                .map_err(|source| PipelineBuildError::Declare {
                    step: step.step_name.to_string(),
                    run_id: "<declare>".to_string(),
                    source,
                })?;
            let declared_runs = ctx.into_runs();

            for run in &declared_runs {
                let task_id = TaskId::new(step.step_name.clone(), run.run_id.clone());
                for outputs in run.output_files.values() {
                    for (output_path, inputs) in outputs {
                        if task_id_for_output_file.contains_key(output_path) {
                            return Err(PipelineBuildError::DuplicateOutput(output_path.clone()));
                        }
                        task_id_for_output_file.insert(output_path.clone(), task_id.clone());
                        for input in inputs {
                            task_ids_for_input_file
                                .entry(input.clone())
                                .or_default()
                                .push(task_id.clone());
                        }
                        file_dependencies.insert(output_path.clone(), inputs.clone());
                    }
                }
            }

            output_dirs.insert(step.step_name.clone(), output_dir);
            resolved_steps.push(step.clone());
            runs.insert(step.step_name.clone(), declared_runs);
        }

        Ok(Self {
            config,
            steps: resolved_steps,
            runs,
            output_dirs,
            task_id_for_output_file,
            task_ids_for_input_file,
            file_dependencies,
        })
    }

    /// All task ids in this pipeline, in step-topological then natural
    /// run-id order.
    pub fn task_ids(&self) -> Vec<TaskId> {
        let mut ids = Vec::new();
        for step in &self.steps {
            if let Some(runs) = self.runs.get(&step.step_name) {
                for run in runs {
                    ids.push(TaskId::new(step.step_name.clone(), run.run_id.clone()));
                }
            }
        }
        ids
    }

    pub fn run_for(&self, task_id: &TaskId) -> Option<&Run> {
        self.runs
            .get(&task_id.step_name)?
            .iter()
            .find(|r| r.run_id == task_id.run_id)
    }

    pub fn step_for(&self, step_name: &StepName) -> Option<&Step> {
        self.steps.iter().find(|s| &s.step_name == step_name)
    }

    pub fn output_dir_for(&self, step_name: &StepName) -> Option<&PathBuf> {
        self.output_dirs.get(step_name)
    }

    /// Tasks whose inputs depend on any output of `task_id` (direct
    /// downstream consumers), used by the cluster submitter to compute
    /// `hold_jid` dependencies.
    pub fn downstream_of(&self, task_id: &TaskId) -> Vec<TaskId> {
        let mut out = Vec::new();
        if let Some(run) = self.run_for(task_id) {
            for output in run.all_output_files() {
                if let Some(consumers) = self.task_ids_for_input_file.get(output) {
                    for consumer in consumers {
                        if !out.contains(consumer) {
                            out.push(consumer.clone());
                        }
                    }
                }
            }
        }
        out
    }
}

/// `resolved_steps` doesn't yet contain `step` (it's pushed after this
/// call); `output_dir_for_step` needs the full ancestor chain including
/// `step` itself, so splice it in for the lookup.
fn resolved_steps_plus(resolved: &[Step], step: &Step) -> Vec<Step> {
    let mut all = resolved.to_vec();
    all.push(step.clone());
    all
}

/// Assemble the `run_id -> tag -> input paths` mapping a step's adapter
/// sees, from its parents' already-declared runs.
/// When a step has more than one dependency its parents' tag maps are
/// merged per run id (last parent wins on tag collisions; declare connects
/// are tree-shaped in practice, see `DESIGN.md`).
fn assemble_inputs(step: &Step, runs: &IndexMap<StepName, Vec<Run>>) -> RunInputs {
    let mut inputs: RunInputs = IndexMap::new();
    for parent_name in &step.dependencies {
        let Some(parent_runs) = runs.get(parent_name) else {
            continue;
        };
        for run in parent_runs {
            let entry: &mut IndexMap<ConnectionTag, Vec<PathBuf>> =
                inputs.entry(run.run_id.clone()).or_default();
            for (tag, outputs) in &run.output_files {
                let paths: Vec<PathBuf> = outputs.keys().cloned().collect();
                entry.insert(tag.clone(), paths);
            }
        }
    }
    inputs
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
