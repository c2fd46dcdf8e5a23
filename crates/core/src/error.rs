// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type shared by the data-model types in this crate. Most fallible
//! operations in `uap` live in `uap-config`/`uap-engine`; this crate only
//! needs to report malformed values handed to it directly (a task id that
//! doesn't parse, for instance).

use crate::task::TaskIdParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    TaskId(#[from] TaskIdParseError),
}
