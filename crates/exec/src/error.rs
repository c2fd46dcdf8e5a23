// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command {command:?} exited with non-zero status {exit_code}")]
    NonZeroExit { command: String, exit_code: i32 },

    #[error("command {command:?} was terminated by a signal")]
    Signaled { command: String },

    #[error("failed to open redirection file {path:?}: {source}")]
    Redirect {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wire pipe for {command:?}: {reason}")]
    PipeWiring { command: String, reason: String },

    #[error("empty argv for command")]
    EmptyArgv,
}

impl ExecError {
    /// Exit code to propagate to the process: the child's own exit code
    /// when one is available, otherwise 2 (generic task failure) for a
    /// spawn failure or a signal death.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::NonZeroExit { exit_code, .. } => *exit_code,
            _ => 2,
        }
    }
}
