// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, dest: &std::path::Path, input: &std::path::Path) -> std::path::PathBuf {
    let text = format!(
        "destination_path: {}\nsteps:\n  raw (source):\n    files:\n      - {}\n  combined (shell):\n    _depends: raw\n    command: \"cat {{inputs}} > {{output}}\"\n    output: combined.txt\n",
        dest.display(),
        input.display(),
    );
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, text).unwrap();
    path
}

#[test]
fn upstream_tasks_follows_input_files_back_to_their_producing_task() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");
    std::fs::create_dir_all(&dest).unwrap();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"hi").unwrap();
    let config_path = write_config(&dir, &dest, &input);

    let pipeline = crate::commands::common::load_pipeline(&config_path).unwrap();
    let combined_task = pipeline
        .task_ids()
        .into_iter()
        .find(|t| t.step_name.as_str() == "combined")
        .unwrap();

    let upstream = upstream_tasks(&pipeline, &combined_task);
    assert_eq!(upstream.len(), 1);
    assert_eq!(upstream[0].step_name.as_str(), "raw");
}

#[tokio::test]
async fn resolving_an_unknown_cluster_flag_is_an_error() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");
    std::fs::create_dir_all(&dest).unwrap();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"hi").unwrap();
    let config_path = write_config(&dir, &dest, &input);

    let args = SubmitToClusterArgs {
        tasks: Vec::new(),
        cluster: "not-a-real-backend".to_string(),
        even_if_dirty: true,
    };
    assert!(run(args, &config_path).await.is_err());
}
