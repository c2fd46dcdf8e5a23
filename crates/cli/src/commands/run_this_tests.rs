// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, dest: &std::path::Path, input: &std::path::Path) -> std::path::PathBuf {
    let text = format!(
        "destination_path: {}\nsteps:\n  raw (source):\n    files:\n      - {}\n",
        dest.display(),
        input.display(),
    );
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, text).unwrap();
    path
}

#[tokio::test]
async fn run_this_executes_exactly_the_named_task() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");
    std::fs::create_dir_all(&dest).unwrap();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"hi").unwrap();
    let config_path = write_config(&dir, &dest, &input);

    let pipeline = crate::commands::common::load_pipeline(&config_path).unwrap();
    let task_id = pipeline.task_ids().into_iter().next().unwrap();

    let code = run(&task_id.to_string(), &config_path, true).await.unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn run_this_rejects_an_unknown_step() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");
    std::fs::create_dir_all(&dest).unwrap();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"hi").unwrap();
    let config_path = write_config(&dir, &dest, &input);

    let result = run("nonexistent/run1", &config_path, true).await;
    assert!(result.is_err());
}
