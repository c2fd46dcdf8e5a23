// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds for the engine. `PipelineBuildError` and `ToolError` are
//! fatal at start-up; `TaskError` terminates one task but leaves its ping
//! in place as a post-mortem; `NotificationError` is constructed but
//! always swallowed at its call site, never propagated.

use crate::declare::DeclareError;
use std::path::PathBuf;
use thiserror::Error;
use uap_config::ConfigError;

#[derive(Debug, Error)]
pub enum PipelineBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("step {0:?} references unregistered module {1:?}")]
    UnknownModule(String, String),

    #[error("step {step:?} run {run_id:?}: {source}")]
    Declare {
        step: String,
        run_id: String,
        #[source]
        source: DeclareError,
    },

    #[error("two runs claim the same output path {0:?}")]
    DuplicateOutput(PathBuf),

    #[error("step {step:?} requires tool {tool:?}, which is not configured")]
    MissingTool { step: String, tool: String },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to spawn tool check for {tool:?}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("tool {tool:?} exited {actual}, expected {expected}")]
    UnexpectedExitCode {
        tool: String,
        actual: i32,
        expected: i32,
    },
    #[error("module_load/pre_command for tool {tool:?} failed: {reason}")]
    PreCommandFailed { tool: String, reason: String },
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task {task_id} failed: {source}")]
    Exec {
        task_id: String,
        #[source]
        source: uap_exec::ExecError,
    },
    #[error("task {task_id} failed: {message}")]
    Other { task_id: String, message: String },
}

impl TaskError {
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskError::Exec { source, .. } => source.exit_code(),
            TaskError::Other { .. } => 2,
        }
    }
}

#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotificationError(pub String);

/// A report emitted by `fix-problems`, never returned as an `Err` (it's
/// data, not a failure mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleState {
    pub task_id: String,
    pub kind: StaleKind,
    pub ping_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleKind {
    /// A run ping older than `PING_TIMEOUT` with no corresponding live job.
    StaleRunPing,
    /// A queued ping whose job id is absent from the live-jobs set.
    StaleQueuedPing,
}
