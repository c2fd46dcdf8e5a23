// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;
use uap_config::{Config, StepEntry};
use uap_engine::Pipeline;

fn entry(name: &str, module: &str, depends: Vec<String>, options: serde_json::Value) -> StepEntry {
    StepEntry {
        step_name: name.to_string(),
        module_name: module.to_string(),
        depends_was_present: !depends.is_empty(),
        depends,
        options,
    }
}

fn base_config(dest: &std::path::Path, steps: Vec<StepEntry>) -> Config {
    Config {
        id: "p".to_string(),
        destination_path: dest.to_path_buf(),
        steps,
        tools: indexmap::IndexMap::new(),
        notify: None,
        cluster: None,
        email: "nobody@example.com".to_string(),
        ping_timeout_secs: 600,
    }
}

#[test]
fn source_step_declares_one_run_per_file() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    std::fs::write(&a, b"aaa").unwrap();
    std::fs::write(&b, b"bbb").unwrap();

    let config = base_config(
        dir.path(),
        vec![entry(
            "raw",
            "source",
            Vec::new(),
            serde_json::json!({ "files": [a.to_string_lossy(), b.to_string_lossy()] }),
        )],
    );

    let registry = demo_registry();
    let pipeline = Pipeline::build(config, &registry, false).unwrap();
    assert_eq!(pipeline.task_ids().len(), 2);
}

#[test]
fn shell_step_renders_inputs_and_output_placeholders() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    std::fs::write(&a, b"aaa").unwrap();

    let config = base_config(
        dir.path(),
        vec![
            entry(
                "raw",
                "source",
                Vec::new(),
                serde_json::json!({ "files": [a.to_string_lossy()] }),
            ),
            entry(
                "combined",
                "shell",
                vec!["raw".to_string()],
                serde_json::json!({ "command": "cat {inputs} > {output}", "output": "combined.txt" }),
            ),
        ],
    );

    let registry = demo_registry();
    let pipeline = Pipeline::build(config, &registry, false).unwrap();

    let shell_run = pipeline
        .runs
        .get(&uap_core::id::StepName::new("combined"))
        .unwrap()
        .first()
        .unwrap();
    let group = &shell_run.exec_groups[0];
    let uap_core::exec_model::ExecItem::Command(cmd) = &group.items[0] else {
        unreachable!()
    };
    let rendered = cmd.argv.last().unwrap();
    assert!(rendered.starts_with("cat "));
    assert!(rendered.contains("combined.txt"));
    assert!(!rendered.contains("{inputs}"));
    assert!(!rendered.contains("{output}"));
}
