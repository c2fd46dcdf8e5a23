// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use indexmap::indexmap;

fn ctx<'a>(options: &'a serde_json::Value, output_dir: &'a Path, temp_root: &'a Path, inputs: &'a RunInputs) -> DeclareCtx<'a> {
    DeclareCtx::new(options, output_dir, temp_root, inputs)
}

#[test]
fn add_output_file_rooted_in_output_dir() {
    let options = serde_json::json!({});
    let output_dir = PathBuf::from("/out/step-abc");
    let temp_root = PathBuf::from("/tmp/task");
    let inputs = RunInputs::new();
    let mut c = ctx(&options, &output_dir, &temp_root, &inputs);

    let mut handle = c.declare_run(RunId::new("r1"));
    let path = handle.add_output_file("out/result", "result.txt", &[]).unwrap();
    assert_eq!(path, output_dir.join("result.txt"));
    handle.finish();

    let runs = c.into_runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, RunId::new("r1"));
}

#[test]
fn duplicate_basename_within_a_run_is_rejected() {
    let options = serde_json::json!({});
    let output_dir = PathBuf::from("/out");
    let temp_root = PathBuf::from("/tmp");
    let inputs = RunInputs::new();
    let mut c = ctx(&options, &output_dir, &temp_root, &inputs);

    let mut handle = c.declare_run(RunId::new("r1"));
    handle.add_output_file("out/a", "x.txt", &[]).unwrap();
    let err = handle.add_output_file("out/b", "x.txt", &[]).unwrap_err();
    assert!(matches!(err, DeclareError::DuplicateBasenameInRun { .. }));
}

#[test]
fn dropping_a_run_handle_without_finish_discards_it() {
    let options = serde_json::json!({});
    let output_dir = PathBuf::from("/out");
    let temp_root = PathBuf::from("/tmp");
    let inputs = RunInputs::new();
    let mut c = ctx(&options, &output_dir, &temp_root, &inputs);

    {
        let mut handle = c.declare_run(RunId::new("discarded"));
        handle.add_output_file("out/a", "x.txt", &[]).unwrap();
        // handle dropped here without finish()
    }

    assert!(c.into_runs().is_empty());
}

#[test]
fn inputs_for_reads_assembled_parent_mapping() {
    let options = serde_json::json!({});
    let output_dir = PathBuf::from("/out");
    let temp_root = PathBuf::from("/tmp");
    let inputs: RunInputs = indexmap! {
        RunId::new("r1") => indexmap! {
            ConnectionTag::new("in/reads") => vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
        },
    };
    let c = ctx(&options, &output_dir, &temp_root, &inputs);
    let found = c.inputs_for(&RunId::new("r1"), &ConnectionTag::new("in/reads"));
    assert_eq!(found, &[PathBuf::from("a.txt"), PathBuf::from("b.txt")]);

    let missing = c.inputs_for(&RunId::new("r1"), &ConnectionTag::new("in/other"));
    assert!(missing.is_empty());
}

#[test]
fn temporary_paths_are_unique_and_rooted_in_temp_dir() {
    let options = serde_json::json!({});
    let output_dir = PathBuf::from("/out");
    let temp_root = PathBuf::from("/tmp/task-xyz");
    let inputs = RunInputs::new();
    let mut c = ctx(&options, &output_dir, &temp_root, &inputs);
    let mut handle = c.declare_run(RunId::new("r1"));

    let a = handle.add_temporary_file("scratch");
    let b = handle.add_temporary_file("scratch");
    assert_ne!(a, b);
    assert!(a.starts_with(&temp_root));
}

#[test]
fn exec_group_handle_accumulates_commands_on_the_run() {
    let options = serde_json::json!({});
    let output_dir = PathBuf::from("/out");
    let temp_root = PathBuf::from("/tmp");
    let inputs = RunInputs::new();
    let mut c = ctx(&options, &output_dir, &temp_root, &inputs);
    let mut handle = c.declare_run(RunId::new("r1"));
    handle
        .new_exec_group()
        .add_command(uap_core::exec_model::Command::new(["true"]));
    handle.finish();

    let runs = c.into_runs();
    assert_eq!(runs[0].exec_groups.len(), 1);
    assert_eq!(runs[0].exec_groups[0].items.len(), 1);
}
