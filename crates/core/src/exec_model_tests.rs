// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn command_builder_sets_redirections() {
    let cmd = Command::new(["cat", "in.txt"])
        .with_stdout("out.txt")
        .with_stderr("err.txt");
    assert_eq!(cmd.argv, vec!["cat", "in.txt"]);
    assert_eq!(cmd.stdout, Some(PathBuf::from("out.txt")));
    assert_eq!(cmd.stderr, Some(PathBuf::from("err.txt")));
    assert_eq!(cmd.stdin, None);
}

#[test]
fn exec_group_add_command_appends_in_order() {
    let mut group = ExecGroup::new();
    group.add_command(Command::new(["a"]));
    group.add_command(Command::new(["b"]));
    assert_eq!(group.items.len(), 2);
    assert_eq!(
        group.items[0],
        ExecItem::Command(Command::new(["a"]))
    );
}

#[test]
fn exec_group_add_pipeline_returns_handle_that_accumulates_commands() {
    let mut group = ExecGroup::new();
    {
        let pipeline = group.add_pipeline();
        pipeline.add_command(Command::new(["a"]));
        pipeline.add_command(Command::new(["b"]));
        pipeline.add_command(Command::new(["c"]).with_stdout("out.gz"));
    }
    assert_eq!(group.items.len(), 1);
    match &group.items[0] {
        ExecItem::Pipeline(p) => {
            assert_eq!(p.commands.len(), 3);
            assert_eq!(p.commands[2].stdout, Some(PathBuf::from("out.gz")));
        }
        ExecItem::Command(_) => panic!("expected a pipeline"),
    }
}

#[test]
fn exec_group_mixes_commands_and_pipelines_in_declaration_order() {
    let mut group = ExecGroup::new();
    group.add_command(Command::new(["sync"]));
    group.add_pipeline().add_command(Command::new(["a"]));
    group.add_command(Command::new(["cleanup"]));
    assert!(matches!(group.items[0], ExecItem::Command(_)));
    assert!(matches!(group.items[1], ExecItem::Pipeline(_)));
    assert!(matches!(group.items[2], ExecItem::Command(_)));
}
