// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads the structured YAML configuration document and exposes it as a
//! typed mapping.

use crate::error::ConfigError;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Step name reserved for the engine's own scratch directory.
pub const RESERVED_STEP_NAME: &str = uap_core::RESERVED_STEP_NAME;

const DEFAULT_PING_TIMEOUT_SECS: u64 = 600;
const DEFAULT_EMAIL: &str = "nobody@example.com";

/// One entry in the configuration's `tools` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    pub path: String,
    #[serde(default)]
    pub get_version: Option<String>,
    #[serde(default)]
    pub exit_code: Option<i32>,
    #[serde(default)]
    pub module_load: Option<String>,
    #[serde(default)]
    pub module_unload: Option<String>,
    #[serde(default)]
    pub pre_command: Option<String>,
    #[serde(default)]
    pub post_command: Option<String>,
}

/// Raw per-step options mapping as it appears under the `steps` key, with
/// `_depends` split out (null, a single name, or a list of names).
#[derive(Debug, Clone, Serialize)]
pub struct StepEntry {
    pub step_name: String,
    pub module_name: String,
    pub depends: Vec<String>,
    pub depends_was_present: bool,
    pub options: serde_json::Value,
}

/// The document as read off disk, before the intermediate YAML value is
/// discarded.
#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    #[serde(default)]
    id: Option<String>,
    destination_path: PathBuf,
    steps: IndexMap<String, serde_yaml::Value>,
    #[serde(default)]
    tools: IndexMap<String, ToolConfig>,
    #[serde(default)]
    notify: Option<String>,
    #[serde(default)]
    cluster: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    ping_timeout_secs: Option<u64>,
}

/// A fully loaded, validated configuration document. Embedded verbatim in
/// every annotation's `config` field for provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub id: String,
    pub destination_path: PathBuf,
    pub steps: Vec<StepEntry>,
    pub tools: IndexMap<String, ToolConfig>,
    pub notify: Option<String>,
    pub cluster: Option<String>,
    pub email: String,
    pub ping_timeout_secs: u64,
}

/// `NAME (MODULE)` step-key form; bare `NAME` uses the name as its own
/// module.
fn step_key_regex() -> Regex {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^\s*(?P<name>[^()\s][^()]*?)\s*\(\s*(?P<module>[^()\s]+)\s*\)\s*$").unwrap()
}

fn parse_step_key(key: &str) -> Result<(String, String), ConfigError> {
    let re = step_key_regex();
    if let Some(caps) = re.captures(key) {
        let name = caps["name"].trim().to_string();
        let module = caps["module"].trim().to_string();
        if name.is_empty() || module.is_empty() {
            return Err(ConfigError::MalformedStepKey(key.to_string()));
        }
        Ok((name, module))
    } else if !key.trim().is_empty() && !key.contains('(') && !key.contains(')') {
        Ok((key.trim().to_string(), key.trim().to_string()))
    } else {
        Err(ConfigError::MalformedStepKey(key.to_string()))
    }
}

fn extract_depends(value: &serde_yaml::Value) -> (Vec<String>, bool) {
    let mapping = match value.as_mapping() {
        Some(m) => m,
        None => return (Vec::new(), false),
    };
    let key = serde_yaml::Value::String("_depends".to_string());
    match mapping.get(&key) {
        None => (Vec::new(), false),
        Some(serde_yaml::Value::Null) => (Vec::new(), true),
        Some(serde_yaml::Value::String(s)) => (vec![s.clone()], true),
        Some(serde_yaml::Value::Sequence(seq)) => {
            let names = seq
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            (names, true)
        }
        Some(_) => (Vec::new(), true),
    }
}

fn options_without_depends(value: &serde_yaml::Value) -> serde_json::Value {
    let mut value = value.clone();
    if let Some(mapping) = value.as_mapping_mut() {
        mapping.remove(serde_yaml::Value::String("_depends".to_string()));
    }
    serde_yaml::from_value(value).unwrap_or(serde_json::Value::Null)
}

/// Load and validate a configuration document from `path`.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&text, path, infer_id(path))
}

fn infer_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "pipeline".to_string())
}

/// Parse and validate configuration text directly (used by tests and by
/// [`load`]). `default_id` is used when the document omits `id`.
pub fn load_str(text: &str, source_path: &Path, default_id: String) -> Result<Config, ConfigError> {
    let raw: RawConfig =
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: source_path.to_path_buf(),
            source,
        })?;

    if raw.steps.is_empty() {
        return Err(ConfigError::MissingKey("steps"));
    }
    if !raw.destination_path.exists() {
        return Err(ConfigError::DestinationNotFound(raw.destination_path));
    }

    let mut steps = Vec::with_capacity(raw.steps.len());
    for (key, value) in &raw.steps {
        let (step_name, module_name) = parse_step_key(key)?;
        if step_name == RESERVED_STEP_NAME {
            return Err(ConfigError::ReservedStepName(step_name));
        }
        let (depends, depends_was_present) = extract_depends(value);
        steps.push(StepEntry {
            step_name,
            module_name,
            depends,
            depends_was_present,
            options: options_without_depends(value),
        });
    }

    Ok(Config {
        id: raw.id.unwrap_or(default_id),
        destination_path: raw.destination_path,
        steps,
        tools: raw.tools,
        notify: raw.notify,
        cluster: raw.cluster,
        email: raw.email.unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
        ping_timeout_secs: raw.ping_timeout_secs.unwrap_or(DEFAULT_PING_TIMEOUT_SECS),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
