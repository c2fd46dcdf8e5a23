// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single (step, run_id) realization produced by a step adapter during
//! declaration: the concrete output files it will write and the subprocess
//! work needed to produce them.

use crate::exec_model::ExecGroup;
use crate::id::{ConnectionTag, RunId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// For one output connection tag, the output files it produces mapped to
/// the input files each output depends on (used for mtime comparisons and
/// annotation provenance).
pub type OutputsByTag = IndexMap<ConnectionTag, IndexMap<PathBuf, Vec<PathBuf>>>;

/// One (step, run_id) realization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: RunId,
    pub output_files: OutputsByTag,
    /// Output connection tags intentionally declared empty (no files),
    /// distinct from a tag that simply was never mentioned.
    pub empty_connections: Vec<ConnectionTag>,
    pub exec_groups: Vec<ExecGroup>,
    pub temporary_files: Vec<PathBuf>,
    pub temporary_directories: Vec<PathBuf>,
    /// Adapter scratch space, opaque to the engine.
    #[serde(default)]
    pub private_info: serde_json::Value,
}

impl Run {
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            output_files: IndexMap::new(),
            empty_connections: Vec::new(),
            exec_groups: Vec::new(),
            temporary_files: Vec::new(),
            temporary_directories: Vec::new(),
            private_info: serde_json::Value::Null,
        }
    }

    /// All output files across every connection tag, in declaration order.
    pub fn all_output_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.output_files.values().flat_map(|m| m.keys())
    }

    /// All input files feeding any output file, deduplicated but not sorted.
    pub fn all_input_files(&self) -> Vec<&PathBuf> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for inputs in self.output_files.values().flat_map(|m| m.values()) {
            for input in inputs {
                if seen.insert(input) {
                    out.push(input);
                }
            }
        }
        out
    }

    /// True if this run declares no subprocess work at all (e.g. a run that
    /// only passes through empty connections). Such runs are not turned
    /// into schedulable tasks.
    pub fn has_exec_groups(&self) -> bool {
        !self.exec_groups.is_empty()
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
