// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use uap_core::id::{ModuleName, StepName};

fn step(name: &str, module: &str, deps: &[&str], options: serde_json::Value) -> Step {
    Step {
        step_name: StepName::new(name),
        module_name: ModuleName::new(module),
        options,
        dependencies: deps.iter().map(|d| StepName::new(*d)).collect(),
        required_tools: Vec::new(),
        cores: 1,
    }
}

#[test]
fn source_step_dir_has_one_component() {
    let steps = vec![step("fastqc", "fastqc", &[], serde_json::json!({}))];
    let dir = output_dir_for_step(Path::new("/dest"), &steps, "fastqc", false).unwrap();
    assert_eq!(dir.parent().unwrap(), Path::new("/dest"));
    assert!(dir.file_name().unwrap().to_string_lossy().starts_with("fastqc-"));
}

#[test]
fn child_step_nests_under_parent_chain() {
    let steps = vec![
        step("trim", "trimmer", &[], serde_json::json!({})),
        step("align", "bowtie2", &["trim"], serde_json::json!({})),
    ];
    let dir = output_dir_for_step(Path::new("/dest"), &steps, "align", false).unwrap();
    let components: Vec<_> = dir
        .strip_prefix("/dest")
        .unwrap()
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    assert_eq!(components.len(), 2);
    assert!(components[0].starts_with("trimmer-"));
    assert!(components[1].starts_with("bowtie2-"));
}

#[test]
fn option_change_changes_the_directory() {
    let a = step("b", "bowtie2", &[], serde_json::json!({"k": 1}));
    let b = step("b", "bowtie2", &[], serde_json::json!({"k": 2}));
    let dir_a = output_dir_for_step(Path::new("/dest"), &[a], "b", false).unwrap();
    let dir_b = output_dir_for_step(Path::new("/dest"), &[b], "b", false).unwrap();
    assert_ne!(dir_a, dir_b);
}

#[test]
fn test_run_mode_prefixes_with_test() {
    let steps = vec![step("a", "m", &[], serde_json::json!({}))];
    let dir = output_dir_for_step(Path::new("/dest"), &steps, "a", true).unwrap();
    assert!(dir.starts_with("/dest/test"));
}

#[test]
fn unknown_step_returns_none() {
    let steps = vec![step("a", "m", &[], serde_json::json!({}))];
    assert!(output_dir_for_step(Path::new("/dest"), &steps, "ghost", false).is_none());
}
