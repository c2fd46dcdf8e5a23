// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step graph construction: instantiate each configured step, validate its
//! declared dependencies, topologically sort (Kahn's algorithm,
//! natural-sort tie-break), and hand back the ordered step list. Invoking
//! each adapter's `runs()` to produce [`Run`]s happens one layer up, in
//! `uap-engine`, which owns the `StepAdapter` trait and registry; this
//! builder only produces the static graph those runs are declared against.

use crate::config::{Config, StepEntry};
use crate::error::ConfigError;
use crate::natsort::natural_cmp;
use std::collections::{HashMap, HashSet};
use uap_core::{ModuleName, Step, StepName};

/// Build the step graph: instantiate steps from `entries`, wire `_depends`,
/// validate source/non-source invariants, and return steps in topological
/// order (ties broken by natural sort of `step_name`).
pub fn build_step_graph(config: &Config) -> Result<Vec<Step>, ConfigError> {
    let steps = instantiate(&config.steps)?;
    validate_dependencies(&config.steps, &steps)?;
    topological_sort(steps)
}

fn instantiate(entries: &[StepEntry]) -> Result<Vec<Step>, ConfigError> {
    let mut seen = HashSet::new();
    let mut steps = Vec::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.step_name.clone()) {
            return Err(ConfigError::DuplicateStep(entry.step_name.clone()));
        }
        steps.push(Step {
            step_name: StepName::new(entry.step_name.clone()),
            module_name: ModuleName::new(entry.module_name.clone()),
            options: entry.options.clone(),
            dependencies: entry
                .depends
                .iter()
                .map(|d| StepName::new(d.clone()))
                .collect(),
            required_tools: Vec::new(),
            cores: 1,
        });
    }
    Ok(steps)
}

fn validate_dependencies(entries: &[StepEntry], steps: &[Step]) -> Result<(), ConfigError> {
    let known: HashSet<&str> = steps.iter().map(|s| s.step_name.as_str()).collect();
    for (entry, step) in entries.iter().zip(steps.iter()) {
        if step.is_source() {
            if entry.depends_was_present {
                return Err(ConfigError::SourceStepWithDepends(step.step_name.to_string()));
            }
            continue;
        }
        if !entry.depends_was_present {
            return Err(ConfigError::NonSourceStepMissingDepends(
                step.step_name.to_string(),
            ));
        }
        for parent in &step.dependencies {
            if !known.contains(parent.as_str()) {
                return Err(ConfigError::UnknownDependency {
                    step: step.step_name.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn topological_sort(mut steps: Vec<Step>) -> Result<Vec<Step>, ConfigError> {
    let by_name: HashMap<String, usize> = steps
        .iter()
        .enumerate()
        .map(|(i, s)| (s.step_name.to_string(), i))
        .collect();

    let mut placed = vec![false; steps.len()];
    let mut order = Vec::with_capacity(steps.len());

    while order.len() < steps.len() {
        let mut ready: Vec<usize> = (0..steps.len())
            .filter(|&i| {
                !placed[i]
                    && steps[i]
                        .dependencies
                        .iter()
                        .all(|parent| placed[by_name[parent.as_str()]])
            })
            .collect();

        if ready.is_empty() {
            let remaining: Vec<String> = (0..steps.len())
                .filter(|&i| !placed[i])
                .map(|i| steps[i].step_name.to_string())
                .collect();
            return Err(ConfigError::Cycle(remaining));
        }

        ready.sort_by(|&a, &b| natural_cmp(steps[a].step_name.as_str(), steps[b].step_name.as_str()));

        for idx in ready {
            placed[idx] = true;
            order.push(idx);
        }
    }

    // Stable reordering: build the output vector by draining in computed
    // order without requiring `Step: Clone` for the move.
    let mut slots: Vec<Option<Step>> = steps.drain(..).map(Some).collect();
    let mut result = Vec::with_capacity(order.len());
    for idx in order {
        #[allow(clippy::expect_used)]
        result.push(slots[idx].take().expect("each index visited exactly once"));
    }
    Ok(result)
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
