// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::ExecError;
use std::path::Path;
use std::process::Stdio;
use tokio::fs::File;
use tokio::process::{Child, Command as TokioCommand};
use uap_core::exec_model::{Command, ExecGroup, ExecItem, Pipeline};

fn argv0(command: &Command) -> String {
    command.argv.first().cloned().unwrap_or_default()
}

async fn stdio_for_input(path: &Path) -> Result<Stdio, ExecError> {
    let file = File::open(path)
        .await
        .map_err(|source| ExecError::Redirect {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(file.into_std().await.into())
}

async fn stdio_for_output(path: &Path) -> Result<Stdio, ExecError> {
    let file = File::create(path)
        .await
        .map_err(|source| ExecError::Redirect {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(file.into_std().await.into())
}

/// Run a single standalone [`Command`], waiting for it to exit. Returns
/// `Err` on a non-zero exit or a spawn/signal failure.
pub async fn run_command(command: &Command, cwd: &Path) -> Result<(), ExecError> {
    if command.argv.is_empty() {
        return Err(ExecError::EmptyArgv);
    }
    let mut tc = TokioCommand::new(&command.argv[0]);
    tc.args(&command.argv[1..]).current_dir(cwd).kill_on_drop(true);

    tc.stdin(match &command.stdin {
        Some(p) => stdio_for_input(p).await?,
        None => Stdio::inherit(),
    });
    tc.stdout(match &command.stdout {
        Some(p) => stdio_for_output(p).await?,
        None => Stdio::inherit(),
    });
    tc.stderr(match &command.stderr {
        Some(p) => stdio_for_output(p).await?,
        None => Stdio::inherit(),
    });

    let mut child = tc.spawn().map_err(|source| ExecError::Spawn {
        command: argv0(command),
        source,
    })?;
    await_child(&mut child, command).await
}

async fn await_child(child: &mut Child, command: &Command) -> Result<(), ExecError> {
    let status = child.wait().await.map_err(|source| ExecError::Spawn {
        command: argv0(command),
        source,
    })?;
    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(ExecError::NonZeroExit {
            command: argv0(command),
            exit_code: code,
        }),
        None => Err(ExecError::Signaled {
            command: argv0(command),
        }),
    }
}

/// Run a [`Pipeline`]: spawn every member command concurrently, wiring
/// stdout of command *i* to stdin of command *i+1*. The first command's
/// stdin and the last command's stdout honor their own redirections if
/// set. Waits for all children; fails if any member fails.
pub async fn run_pipeline(pipeline: &Pipeline, cwd: &Path) -> Result<(), ExecError> {
    if pipeline.commands.is_empty() {
        return Ok(());
    }
    let n = pipeline.commands.len();
    let mut children = Vec::with_capacity(n);

    // Stdout of command i becomes stdin of command i+1. We spawn
    // left-to-right so each child's piped stdout is available to wire into
    // the next child's stdin.
    let mut next_stdin: Option<Stdio> = None;
    for (i, command) in pipeline.commands.iter().enumerate() {
        if command.argv.is_empty() {
            return Err(ExecError::EmptyArgv);
        }
        let mut tc = TokioCommand::new(&command.argv[0]);
        tc.args(&command.argv[1..]).current_dir(cwd).kill_on_drop(true);

        let stdin = if i == 0 {
            match &command.stdin {
                Some(p) => stdio_for_input(p).await?,
                None => Stdio::inherit(),
            }
        } else {
            next_stdin.take().ok_or_else(|| ExecError::PipeWiring {
                command: argv0(command),
                reason: "missing upstream stdout pipe".to_string(),
            })?
        };
        tc.stdin(stdin);

        let is_last = i + 1 == n;
        if is_last {
            tc.stdout(match &command.stdout {
                Some(p) => stdio_for_output(p).await?,
                None => Stdio::inherit(),
            });
        } else {
            tc.stdout(Stdio::piped());
        }
        tc.stderr(match &command.stderr {
            Some(p) => stdio_for_output(p).await?,
            None => Stdio::inherit(),
        });

        let mut child = tc.spawn().map_err(|source| ExecError::Spawn {
            command: argv0(command),
            source,
        })?;

        if !is_last {
            let stdout = child.stdout.take().ok_or_else(|| ExecError::PipeWiring {
                command: argv0(command),
                reason: "child stdout pipe unavailable".to_string(),
            })?;
            let piped: Stdio = stdout.try_into().map_err(|source| ExecError::Spawn {
                command: argv0(command),
                source,
            })?;
            next_stdin = Some(piped);
        }

        children.push((command, child));
    }

    // Wait for all children concurrently; pipefail semantics: any failure
    // fails the whole pipeline.
    let mut first_err = None;
    for (command, mut child) in children {
        let result = await_child(&mut child, command).await;
        if let Err(err) = result {
            if first_err.is_none() {
                first_err = Some(err);
            }
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Run either a standalone [`Command`] or a [`Pipeline`].
pub async fn run_item(item: &ExecItem, cwd: &Path) -> Result<(), ExecError> {
    match item {
        ExecItem::Command(command) => run_command(command, cwd).await,
        ExecItem::Pipeline(pipeline) => run_pipeline(pipeline, cwd).await,
    }
}

/// Run every item of an [`ExecGroup`] in declaration order. ExecGroups run
/// strictly sequentially; the first failing item stops the group.
pub async fn run_exec_group(group: &ExecGroup, cwd: &Path) -> Result<(), ExecError> {
    for item in &group.items {
        run_item(item, cwd).await?;
    }
    Ok(())
}

/// Run every [`ExecGroup`] of a run, in order. The first failing group
/// stops the run.
pub async fn run_exec_groups(groups: &[ExecGroup], cwd: &Path) -> Result<(), ExecError> {
    for group in groups {
        run_exec_group(group, cwd).await?;
    }
    Ok(())
}
