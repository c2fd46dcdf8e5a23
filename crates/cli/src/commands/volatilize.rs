// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uap volatilize` — report (and, with `--srsly`, clear) the content of
//! intermediate outputs that a downstream task has already consumed.

use anyhow::Result;
use clap::Args;
use std::path::Path;
use uap_engine::{find_candidates, volatilize, FsCache};

#[derive(Args)]
pub struct VolatilizeArgs {
    /// Actually overwrite each candidate's content; without this flag,
    /// only a report is printed.
    #[arg(long)]
    pub srsly: bool,
}

pub async fn run(args: VolatilizeArgs, config_path: &Path) -> Result<i32> {
    let pipeline = super::common::load_pipeline(config_path)?;
    let candidates = find_candidates(&pipeline);

    let total_bytes: u64 = candidates.iter().map(|c| c.size_bytes).sum();
    println!(
        "{} candidate(s), {} byte(s) total.",
        candidates.len(),
        total_bytes
    );
    for candidate in &candidates {
        println!(
            "  {} ({} bytes, produced by {})",
            candidate.path.display(),
            candidate.size_bytes,
            candidate.task_id
        );
    }

    if args.srsly {
        let fscache = FsCache::new();
        volatilize(&candidates, &fscache).await?;
        println!("volatilized {} file(s).", candidates.len());
    } else if !candidates.is_empty() {
        println!("Hint: pass --srsly to clear these files.");
    }

    Ok(0)
}

#[cfg(test)]
#[path = "volatilize_tests.rs"]
mod tests;
