// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A node in the user-declared processing graph.

use crate::id::{ModuleName, StepName};
use serde::{Deserialize, Serialize};

/// Reserved step name: the `temp` output directory is owned by the engine.
pub const RESERVED_STEP_NAME: &str = "temp";

/// A step instance: a `module_name` adapter bound to a `step_name` with
/// configuration options and a set of parent steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub step_name: StepName,
    pub module_name: ModuleName,
    /// Opaque options mapping passed to the adapter, also hashed into the
    /// output directory path (see [`crate::options_hash::options_hashtag`]).
    pub options: serde_json::Value,
    /// Parent step names, in declaration order. Empty means this is a
    /// source step.
    pub dependencies: Vec<StepName>,
    /// Tool ids this step's adapter requires to be present in the
    /// configuration's `tools` table.
    pub required_tools: Vec<String>,
    /// Number of CPU cores this step's tasks should be allocated (used by
    /// the cluster submitter's `#{CORES}` template placeholder).
    pub cores: u32,
}

impl Step {
    /// A source step has no incoming connections, i.e. no dependencies.
    pub fn is_source(&self) -> bool {
        self.dependencies.is_empty()
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
