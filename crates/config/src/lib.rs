// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! uap-config: the structured configuration document loader (C2) and the
//! step graph builder (C3).

pub mod config;
pub mod error;
pub mod graph;
pub mod natsort;

pub use config::{load, load_str, Config, StepEntry, ToolConfig};
pub use error::ConfigError;
pub use graph::build_step_graph;
pub use natsort::{natural_cmp, natural_sort_by_key};
