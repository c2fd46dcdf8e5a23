// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! uap-engine: everything that runs once a step graph has been expanded
//! into runs — the filesystem stat cache, the run-declaration API step
//! adapters implement, the task/state derivation, the local executor and
//! cluster submitter, ping/annotation bookkeeping, tool checks, the
//! notifier, and the repository provenance capture embedded in every
//! annotation.

pub mod adapter;
pub mod annotate;
pub mod cluster;
pub mod declare;
pub mod error;
pub mod executor;
pub mod fix_problems;
pub mod fs_layout;
pub mod fscache;
pub mod git;
pub mod notify;
pub mod ping;
pub mod pipeline;
pub mod state_engine;
pub mod tools;
pub mod volatilize;

pub use adapter::{StepAdapter, StepRegistry};
pub use annotate::{annotation_path, write_annotation, Annotation, AnnotationRunInfo};
pub use cluster::{autodetect, backend_for, live_jobs, ClusterBackend, ClusterKind};
pub use declare::{DeclareCtx, DeclareError, RunHandle, RunInputs};
pub use error::{NotificationError, PipelineBuildError, StaleKind, StaleState, TaskError, ToolError};
pub use executor::{execute_task, ExecutionReport};
pub use fix_problems::{find_stale_pings, remove_stale_pings};
pub use fs_layout::{dir_component, output_dir_for_step, output_symlink_name};
pub use fscache::FsCache;
pub use git::GitState;
pub use notify::notify;
pub use pipeline::Pipeline;
pub use state_engine::{task_state, DryRunCache, TimeSource, DEFAULT_PING_TIMEOUT};
pub use tools::{check_tool, check_tools, ToolCheckInfo};
pub use volatilize::{find_candidates, volatilize, VolatilizeCandidate};
