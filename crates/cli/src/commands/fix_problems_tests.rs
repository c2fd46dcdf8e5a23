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
async fn fix_problems_reports_without_deleting_by_default() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");
    std::fs::create_dir_all(&dest).unwrap();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"hi").unwrap();
    let config_path = write_config(&dir, &dest, &input);

    let args = FixProblemsArgs {
        details: true,
        srsly: false,
    };
    let code = run(args, &config_path).await.unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn fix_problems_srsly_leaves_a_fresh_run_ping_alone() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");
    std::fs::create_dir_all(&dest).unwrap();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"hi").unwrap();
    let config_path = write_config(&dir, &dest, &input);

    let pipeline = crate::commands::common::load_pipeline(&config_path).unwrap();
    let task_id = pipeline.task_ids().into_iter().next().unwrap();
    let output_dir = pipeline.output_dir_for(&task_id.step_name).unwrap();
    std::fs::create_dir_all(output_dir).unwrap();
    uap_engine::ping::write_run_ping(output_dir, &task_id.run_id, "now")
        .await
        .unwrap();
    let ping_path = uap_engine::ping::run_ping_path(output_dir, &task_id.run_id);

    let args = FixProblemsArgs {
        details: false,
        srsly: true,
    };
    let code = run(args, &config_path).await.unwrap();
    assert_eq!(code, 0);
    assert!(ping_path.exists());
}
