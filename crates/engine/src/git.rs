// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository provenance capture: `uap` refuses to start if the
//! repository containing the pipeline has a dirty working tree, unless
//! `--even-if-dirty` is passed, and always embeds the dirty diff in
//! annotations whenever the tree is dirty (see `DESIGN.md` for why the
//! diff is captured even when `--even-if-dirty` isn't needed to proceed).

use std::path::Path;
use tokio::process::Command;

/// A snapshot of the repository's state, embedded verbatim in every
/// annotation as `git_hash_tag`/`git_dirty_diff`.
#[derive(Debug, Clone, Default)]
pub struct GitState {
    pub hash_tag: String,
    pub dirty: bool,
    pub dirty_diff: Option<String>,
}

/// Run `git describe --all --dirty --long` in `cwd`, and if the tree is
/// dirty, also capture `git diff`. Returns `GitState::default()` (empty
/// hash tag, not dirty) when `cwd` is not inside a Git repository at all,
/// matching the original's tolerance for running outside of version
/// control during local development.
pub async fn capture(cwd: &Path) -> GitState {
    let describe = Command::new("git")
        .args(["describe", "--all", "--dirty", "--long"])
        .current_dir(cwd)
        .output()
        .await;

    let Ok(output) = describe else {
        return GitState::default();
    };
    if !output.status.success() {
        return GitState::default();
    }

    let hash_tag = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let dirty = hash_tag.ends_with("-dirty");

    let dirty_diff = if dirty {
        Command::new("git")
            .arg("diff")
            .current_dir(cwd)
            .output()
            .await
            .ok()
            .map(|o| String::from_utf8_lossy(&o.stdout).to_string())
    } else {
        None
    };

    GitState {
        hash_tag,
        dirty,
        dirty_diff,
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
