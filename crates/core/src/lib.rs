// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! uap-core: shared data model for the uap pipeline engine.
//!
//! Every other crate in the workspace depends on this one; it carries no
//! runtime logic of its own, only the types that flow between them: step
//! graph nodes, run declarations, the exec-group tree, task identity and
//! state, and the option-hashing/id/clock primitives the rest of the
//! workspace builds on.

pub mod clock;
pub mod error;
pub mod exec_model;
pub mod id;
pub mod options_hash;
pub mod run;
pub mod step;
pub mod task;
pub mod time_fmt;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::CoreError;
pub use exec_model::{Command, ExecGroup, ExecItem, Pipeline};
pub use id::{ConnectionTag, ModuleName, RunId, StepName};
pub use options_hash::options_hashtag;
pub use run::{OutputsByTag, Run};
pub use step::{Step, RESERVED_STEP_NAME};
pub use task::{PrimaryState, TaskId, TaskIdParseError, TaskState};
pub use time_fmt::{format_bytes, format_elapsed, format_elapsed_ms, format_rfc3339};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
