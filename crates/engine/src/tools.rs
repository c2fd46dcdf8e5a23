// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool check: for every tool the configuration declares, optionally run
//! `module_load`/`pre_command`, run `path get_version` and capture its
//! exit code plus combined stdout+stderr, compare against the declared
//! (or default-0) expected exit code, then run `module_unload`/
//! `post_command`. A mismatch is fatal at start-up, before any task is
//! created.

use crate::error::ToolError;
use indexmap::IndexMap;
use serde::Serialize;
use tokio::process::Command;
use uap_config::ToolConfig;

/// Recorded result of checking one tool, embedded verbatim in every
/// annotation's `tool_versions` map.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCheckInfo {
    pub command: String,
    pub exit_code: i32,
    pub response: String,
}

/// Marker line separating a shell command's own stdout from the trailing
/// `env` dump `run_shell` appends when `capture_env` is set.
const ENV_MARKER: &str = "__uap_env_dump__";

/// Run one shell command with `env` applied to its process environment.
/// When `capture_env` is set, the command is followed by a marker line and
/// an `env` dump so the caller can see what the command itself exported
/// (used for `module_load`, which is expected to mutate the environment
/// that the subsequent `get_version` call runs under).
async fn run_shell(
    tool_id: &str,
    label: &str,
    command_line: &str,
    env: &[(String, String)],
    capture_env: bool,
) -> Result<(String, Vec<(String, String)>), ToolError> {
    let script = if capture_env {
        format!("{command_line}\necho {ENV_MARKER}\nenv")
    } else {
        command_line.to_string()
    };

    let mut command = Command::new("sh");
    command.arg("-c").arg(&script);
    command.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let output = command.output().await.map_err(|source| ToolError::Spawn {
        tool: tool_id.to_string(),
        source,
    })?;
    if !output.status.success() {
        return Err(ToolError::PreCommandFailed {
            tool: tool_id.to_string(),
            reason: format!(
                "{label} {command_line:?} exited {:?}",
                output.status.code()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if !capture_env {
        return Ok((stdout, Vec::new()));
    }
    let (body, dump) = stdout.split_once(ENV_MARKER).unwrap_or((stdout.as_str(), ""));
    Ok((body.to_string(), parse_env_dump(dump)))
}

/// Parse `env`'s `KEY=value` output, one pair per line.
fn parse_env_dump(dump: &str) -> Vec<(String, String)> {
    dump.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Check one tool: run its pre-hooks, invoke `path [get_version]` with
/// whatever environment `module_load` exported, compare its exit code to
/// the expected one, then run its post-hooks.
pub async fn check_tool(tool_id: &str, config: &ToolConfig) -> Result<ToolCheckInfo, ToolError> {
    let mut env: Vec<(String, String)> = Vec::new();
    if let Some(module_load) = &config.module_load {
        let (_, exported) = run_shell(tool_id, "module_load", module_load, &env, true).await?;
        env = exported;
    }
    if let Some(pre_command) = &config.pre_command {
        run_shell(tool_id, "pre_command", pre_command, &env, false).await?;
    }

    let mut argv = vec![config.path.clone()];
    if let Some(get_version) = &config.get_version {
        argv.push(get_version.clone());
    }

    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);
    command.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    let output = command.output().await.map_err(|source| ToolError::Spawn {
        tool: tool_id.to_string(),
        source,
    })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let expected = config.exit_code.unwrap_or(0);
    if exit_code != expected {
        tracing::error!(tool = tool_id, exit_code, expected, "tool check failed");
        return Err(ToolError::UnexpectedExitCode {
            tool: tool_id.to_string(),
            actual: exit_code,
            expected,
        });
    }

    let mut response = String::from_utf8_lossy(&output.stdout).to_string();
    response.push_str(&String::from_utf8_lossy(&output.stderr));

    if let Some(module_unload) = &config.module_unload {
        run_shell(tool_id, "module_unload", module_unload, &env, false).await?;
    }
    if let Some(post_command) = &config.post_command {
        run_shell(tool_id, "post_command", post_command, &env, false).await?;
    }

    Ok(ToolCheckInfo {
        command: argv.join(" "),
        exit_code,
        response: response.trim().to_string(),
    })
}

/// Check every tool in `tools`, short-circuiting (and propagating) on the
/// first failure: a bad tool must be caught before any task is created.
pub async fn check_tools(
    tools: &IndexMap<String, ToolConfig>,
) -> Result<IndexMap<String, ToolCheckInfo>, ToolError> {
    let mut results = IndexMap::with_capacity(tools.len());
    for (tool_id, config) in tools {
        let info = check_tool(tool_id, config).await?;
        results.insert(tool_id.clone(), info);
    }
    Ok(results)
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
