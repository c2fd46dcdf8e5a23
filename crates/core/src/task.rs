// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A task is a (Step, RunID) pair. Its identity is the string
//! `step_name/run_id`; its state is derived, never stored.

use crate::id::{RunId, StepName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A schedulable unit of work: one run of one step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId {
    pub step_name: StepName,
    pub run_id: RunId,
}

impl TaskId {
    pub fn new(step_name: StepName, run_id: RunId) -> Self {
        Self { step_name, run_id }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.step_name, self.run_id)
    }
}

impl std::str::FromStr for TaskId {
    type Err = TaskIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((step, run)) if !step.is_empty() && !run.is_empty() => {
                Ok(TaskId::new(StepName::new(step), RunId::new(run)))
            }
            _ => Err(TaskIdParseError(s.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid task id {0:?}, expected \"step_name/run_id\"")]
pub struct TaskIdParseError(String);

/// The primary state a task is in, mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryState {
    /// Some input file is missing.
    Waiting,
    /// All inputs exist, outputs don't (or are stale).
    Ready,
    /// Submitted to a cluster and its job id is in the live-jobs set.
    Queued,
    /// A fresh run ping exists.
    Executing,
    /// All outputs exist and are newer than every input that feeds them.
    Finished,
}

impl fmt::Display for PrimaryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimaryState::Waiting => "WAITING",
            PrimaryState::Ready => "READY",
            PrimaryState::Queued => "QUEUED",
            PrimaryState::Executing => "EXECUTING",
            PrimaryState::Finished => "FINISHED",
        };
        write!(f, "{s}")
    }
}

/// Full task state: the primary, mutually-exclusive state plus the
/// orthogonal `changed` report (outputs exist but are older than an input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub primary: PrimaryState,
    pub changed: bool,
}

impl TaskState {
    pub fn new(primary: PrimaryState, changed: bool) -> Self {
        Self { primary, changed }
    }

    pub fn is_finished(&self) -> bool {
        self.primary == PrimaryState::Finished
    }

    pub fn is_ready(&self) -> bool {
        self.primary == PrimaryState::Ready
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changed {
            write!(f, "{} (CHANGED)", self.primary)
        } else {
            write!(f, "{}", self.primary)
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
