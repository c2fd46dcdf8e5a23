// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! uap - a workflow engine for long-running multi-step data processing
//! pipelines.

mod commands;
mod steps;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{fix_problems, run_locally, run_this, status, submit_to_cluster, volatilize};

#[derive(Parser)]
#[command(name = "uap", version, about = "A workflow engine for long-running multi-step data processing pipelines")]
struct Cli {
    /// Change to <dir> before doing anything.
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Path to the pipeline's configuration document.
    #[arg(short = 'c', long = "config", global = true, default_value = "config.yaml")]
    config: PathBuf,

    /// Internal entry point a cluster job script uses to run exactly one
    /// task. Bypasses subcommand dispatch entirely when present.
    #[arg(long = "run-this", value_name = "TASK_ID")]
    run_this: Option<String>,

    /// Proceed even if the repository's working tree is dirty. Only
    /// consulted alongside `--run-this`; every subcommand that needs this
    /// flag declares its own.
    #[arg(long = "even-if-dirty")]
    even_if_dirty: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print per-task state summary.
    Status(status::StatusArgs),
    /// Execute READY tasks in-process, in topological order.
    RunLocally(run_locally::RunLocallyArgs),
    /// Submit tasks to a batch cluster.
    SubmitToCluster(submit_to_cluster::SubmitToClusterArgs),
    /// Report (and optionally delete) stale ping files.
    FixProblems(fix_problems::FixProblemsArgs),
    /// Report (and optionally clear) recomputable intermediate outputs.
    Volatilize(volatilize::VolatilizeArgs),
}

#[tokio::main]
async fn main() {
    init_logging();

    match run().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)
            .map_err(|e| anyhow::anyhow!("failed to change to {}: {e}", dir.display()))?;
    }

    // `--run-this` is a cluster-job internal entry point: it bypasses
    // every subcommand and runs exactly the named task.
    if let Some(task_id) = &cli.run_this {
        return run_this::run(task_id, &cli.config, cli.even_if_dirty).await;
    }

    match cli.command {
        Some(Commands::Status(args)) => status::run(args, &cli.config).await,
        Some(Commands::RunLocally(args)) => run_locally::run(args, &cli.config).await,
        Some(Commands::SubmitToCluster(args)) => submit_to_cluster::run(args, &cli.config).await,
        Some(Commands::FixProblems(args)) => fix_problems::run(args, &cli.config).await,
        Some(Commands::Volatilize(args)) => volatilize::run(args, &cli.config).await,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(1)
        }
    }
}
