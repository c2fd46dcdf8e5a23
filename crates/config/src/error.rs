// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while loading a configuration document or building the
//! step graph from it. Both phases are fatal at start-up: a `ConfigError`
//! of any variant means no task is ever created.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?} as YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing required config key {0:?}")]
    MissingKey(&'static str),

    #[error("destination_path {0:?} does not exist")]
    DestinationNotFound(PathBuf),

    #[error("step name {0:?} is reserved and cannot be used")]
    ReservedStepName(String),

    #[error("duplicate step name {0:?}")]
    DuplicateStep(String),

    #[error("step {0:?} is a source step (no incoming connections) but declares _depends")]
    SourceStepWithDepends(String),

    #[error("step {0:?} is not a source step and must declare _depends (use `_depends: null` if it has none by choice is not allowed; declare parents)")]
    NonSourceStepMissingDepends(String),

    #[error("step {step:?} depends on unknown step {parent:?}")]
    UnknownDependency { step: String, parent: String },

    #[error("cycle detected in step graph, unplaceable steps: {0:?}")]
    Cycle(Vec<String>),

    #[error("malformed step key {0:?}, expected NAME or \"NAME (MODULE)\"")]
    MalformedStepKey(String),

    #[error("two runs claim the same output path {0:?}")]
    DuplicateOutput(PathBuf),

    #[error("step {step:?} declares duplicate output basename {basename:?} within run {run_id:?}")]
    DuplicateOutputBasename {
        step: String,
        run_id: String,
        basename: String,
    },
}
