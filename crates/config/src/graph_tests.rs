// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::StepEntry;

fn entry(name: &str, module: &str, depends: &[&str]) -> StepEntry {
    StepEntry {
        step_name: name.to_string(),
        module_name: module.to_string(),
        depends: depends.iter().map(|s| s.to_string()).collect(),
        depends_was_present: !depends.is_empty(),
        options: serde_json::json!({}),
    }
}

fn config_with(entries: Vec<StepEntry>) -> Config {
    Config {
        id: "p".to_string(),
        destination_path: std::env::temp_dir(),
        steps: entries,
        tools: Default::default(),
        notify: None,
        cluster: None,
        email: "nobody@example.com".to_string(),
        ping_timeout_secs: 600,
    }
}

#[test]
fn linear_chain_topo_order() {
    let cfg = config_with(vec![
        entry("C", "c", &["B"]),
        entry("A", "a", &[]),
        entry("B", "b", &["A"]),
    ]);
    let steps = build_step_graph(&cfg).unwrap();
    let names: Vec<_> = steps.iter().map(|s| s.step_name.to_string()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn ties_broken_by_natural_sort() {
    let cfg = config_with(vec![
        entry("step10", "m", &[]),
        entry("step2", "m", &[]),
        entry("step1", "m", &[]),
    ]);
    let steps = build_step_graph(&cfg).unwrap();
    let names: Vec<_> = steps.iter().map(|s| s.step_name.to_string()).collect();
    assert_eq!(names, vec!["step1", "step2", "step10"]);
}

#[test]
fn cycle_is_detected_and_no_tasks_emitted() {
    let cfg = config_with(vec![entry("A", "a", &["B"]), entry("B", "b", &["A"])]);
    let err = build_step_graph(&cfg).unwrap_err();
    match err {
        ConfigError::Cycle(remaining) => {
            assert_eq!(remaining.len(), 2);
        }
        other => panic!("expected Cycle, got {other:?}"),
    }
}

#[test]
fn duplicate_step_name_fails() {
    let cfg = config_with(vec![entry("A", "a", &[]), entry("A", "b", &[])]);
    let err = build_step_graph(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateStep(name) if name == "A"));
}

#[test]
fn unknown_dependency_fails() {
    let cfg = config_with(vec![entry("A", "a", &["ghost"])]);
    let err = build_step_graph(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownDependency { .. }));
}

#[test]
fn source_step_with_explicit_depends_fails() {
    let cfg = config_with(vec![StepEntry {
        step_name: "A".to_string(),
        module_name: "a".to_string(),
        depends: Vec::new(),
        depends_was_present: true,
        options: serde_json::json!({}),
    }]);
    let err = build_step_graph(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::SourceStepWithDepends(name) if name == "A"));
}

#[test]
fn diamond_dependency_resolves() {
    let cfg = config_with(vec![
        entry("D", "d", &["B", "C"]),
        entry("B", "b", &["A"]),
        entry("C", "c", &["A"]),
        entry("A", "a", &[]),
    ]);
    let steps = build_step_graph(&cfg).unwrap();
    let names: Vec<_> = steps.iter().map(|s| s.step_name.to_string()).collect();
    assert_eq!(names[0], "A");
    assert_eq!(names[3], "D");
    assert!(names[1..3].contains(&"B".to_string()));
    assert!(names[1..3].contains(&"C".to_string()));
}
