// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use indexmap::indexmap;

#[test]
fn new_run_has_no_exec_groups() {
    let run = Run::new(RunId::new("sample-1"));
    assert!(!run.has_exec_groups());
}

#[test]
fn has_exec_groups_once_one_is_pushed() {
    let mut run = Run::new(RunId::new("sample-1"));
    run.exec_groups.push(ExecGroup::new());
    assert!(run.has_exec_groups());
}

#[test]
fn all_output_files_flattens_across_tags() {
    let mut run = Run::new(RunId::new("r1"));
    run.output_files.insert(
        ConnectionTag::new("out/a"),
        indexmap! { PathBuf::from("a.txt") => vec![] },
    );
    run.output_files.insert(
        ConnectionTag::new("out/b"),
        indexmap! { PathBuf::from("b.txt") => vec![] },
    );
    let files: Vec<_> = run.all_output_files().collect();
    assert_eq!(files, vec![&PathBuf::from("a.txt"), &PathBuf::from("b.txt")]);
}

#[test]
fn all_input_files_dedupes_across_outputs() {
    let mut run = Run::new(RunId::new("r1"));
    run.output_files.insert(
        ConnectionTag::new("out/a"),
        indexmap! {
            PathBuf::from("a.txt") => vec![PathBuf::from("in.txt")],
            PathBuf::from("b.txt") => vec![PathBuf::from("in.txt"), PathBuf::from("in2.txt")],
        },
    );
    let inputs = run.all_input_files();
    assert_eq!(inputs.len(), 2);
    assert!(inputs.contains(&&PathBuf::from("in.txt")));
    assert!(inputs.contains(&&PathBuf::from("in2.txt")));
}
