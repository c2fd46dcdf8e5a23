// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derives a step's output directory from its position in the step graph
//! and its options: each step contributes
//! `<module_name>-<8-hex-of-sha1(canonical-options)>` to the path, nested
//! under its ancestor chain, so changing options produces a new directory
//! without disturbing siblings. Under `TEST_RUN` mode the whole path is
//! prefixed with `test/`.
//!
//! Step dependencies form a tree in this core; a step's directory chain
//! follows its first declared dependency when more than one is present
//! (see `DESIGN.md`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uap_core::options_hash::options_hashtag;
use uap_core::step::Step;

/// One path component: `<module_name>-<opthash>`.
pub fn dir_component(step: &Step) -> String {
    format!("{}-{}", step.module_name, options_hashtag(&step.options))
}

/// The full output directory for `step_name`, given the complete (already
/// topologically valid) step list.
pub fn output_dir_for_step(
    destination: &Path,
    steps: &[Step],
    step_name: &str,
    test_run: bool,
) -> Option<PathBuf> {
    let by_name: HashMap<&str, &Step> =
        steps.iter().map(|s| (s.step_name.as_str(), s)).collect();

    let mut chain = Vec::new();
    let mut current = *by_name.get(step_name)?;
    chain.push(current);
    while let Some(parent_name) = current.dependencies.first() {
        current = by_name.get(parent_name.as_str())?;
        chain.push(current);
    }
    chain.reverse();

    let mut path = destination.to_path_buf();
    if test_run {
        path.push("test");
    }
    for step in chain {
        path.push(dir_component(step));
    }
    Some(path)
}

/// The `<id>-out` symlink target name for a pipeline id.
pub fn output_symlink_name(pipeline_id: &str) -> String {
    format!("{pipeline_id}-out")
}

#[cfg(test)]
#[path = "fs_layout_tests.rs"]
mod tests;
