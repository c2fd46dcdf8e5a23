// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, dest: &std::path::Path, input: &std::path::Path, output_name: &str) -> std::path::PathBuf {
    let text = format!(
        "destination_path: {}\nsteps:\n  raw (source):\n    files:\n      - {}\n  combined (shell):\n    _depends: raw\n    command: \"cat {{inputs}} > {{output}}\"\n    output: {}\n",
        dest.display(),
        input.display(),
        output_name,
    );
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, text).unwrap();
    path
}

#[tokio::test]
async fn run_locally_executes_every_ready_task_and_publishes_outputs() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("dest");
    std::fs::create_dir_all(&dest).unwrap();
    let input = dir.path().join("a.txt");
    std::fs::write(&input, b"hello\n").unwrap();
    let config_path = write_config(&dir, &dest, &input, "combined.txt");

    let args = RunLocallyArgs {
        tasks: Vec::new(),
        even_if_dirty: true,
        ping_touch_interval_secs: 3600,
    };
    let code = run(args, &config_path).await.unwrap();
    assert_eq!(code, 0);

    // Re-running should find every task already FINISHED and do nothing.
    let args = RunLocallyArgs {
        tasks: Vec::new(),
        even_if_dirty: true,
        ping_touch_interval_secs: 3600,
    };
    let code = run(args, &config_path).await.unwrap();
    assert_eq!(code, 0);
}
