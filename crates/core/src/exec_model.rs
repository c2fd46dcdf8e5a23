// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tree of subprocess work declared by a single run: an ordered list of
//! [`ExecGroup`]s, each an ordered list of [`Command`]s or [`Pipeline`]s.
//!
//! ExecGroups run strictly sequentially. Items within an ExecGroup run
//! sequentially unless wrapped in a [`Pipeline`], whose member commands run
//! concurrently, connected stdout-to-stdin.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single external command: an argv vector plus optional redirections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub argv: Vec<String>,
    pub stdin: Option<PathBuf>,
    pub stdout: Option<PathBuf>,
    pub stderr: Option<PathBuf>,
}

impl Command {
    pub fn new(argv: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            stdin: None,
            stdout: None,
            stderr: None,
        }
    }

    pub fn with_stdout(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    pub fn with_stderr(mut self, path: impl Into<PathBuf>) -> Self {
        self.stderr = Some(path.into());
        self
    }

    pub fn with_stdin(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }
}

/// A chain of commands connected stdout -> stdin, executed concurrently.
/// The first command's stdin and the last command's stdout may still carry
/// their own redirection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }
}

/// Either a standalone [`Command`] or a [`Pipeline`] of piped commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecItem {
    Command(Command),
    Pipeline(Pipeline),
}

/// An ordered, sequentially-executed group of [`ExecItem`]s. A run carries
/// an ordered list of these; groups themselves run one after another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecGroup {
    pub items: Vec<ExecItem>,
}

impl ExecGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: Command) -> &mut Self {
        self.items.push(ExecItem::Command(command));
        self
    }

    pub fn add_pipeline(&mut self) -> &mut Pipeline {
        let index = self.items.len();
        self.items.push(ExecItem::Pipeline(Pipeline::new()));
        match &mut self.items[index] {
            ExecItem::Pipeline(p) => p,
            ExecItem::Command(_) => unreachable!(),
        }
    }
}

#[cfg(test)]
#[path = "exec_model_tests.rs"]
mod tests;
