// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::adapter::{fake::FakeAdapter, StepRegistry};
use crate::fs_layout::dir_component;
use crate::ping::{write_queued_ping, write_run_ping};
use indexmap::IndexMap;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use uap_config::{Config, StepEntry};
use uap_core::id::RunId;
use uap_core::test_support::{run_with_one_output, source_step};

fn base_config(dest: &std::path::Path) -> Config {
    Config {
        id: "p".to_string(),
        destination_path: dest.to_path_buf(),
        steps: vec![StepEntry {
            step_name: "raw".to_string(),
            module_name: "source_module".to_string(),
            depends: Vec::new(),
            depends_was_present: false,
            options: serde_json::json!({}),
        }],
        tools: IndexMap::new(),
        notify: None,
        cluster: None,
        email: "nobody@example.com".to_string(),
        ping_timeout_secs: 600,
    }
}

fn build_pipeline(dir: &TempDir) -> (Pipeline, std::path::PathBuf) {
    let config = base_config(dir.path());
    let step = source_step("raw", "source_module");
    let output_dir = dir.path().join(dir_component(&step));

    let mut registry = StepRegistry::new();
    let output_dir_for_closure = output_dir.clone();
    registry.register("source_module", move || {
        let output_path = output_dir_for_closure.join("reads.fastq");
        Box::new(FakeAdapter::new(vec![run_with_one_output(
            "r1",
            "out/reads",
            output_path,
            &[],
        )]))
    });

    let pipeline = Pipeline::build(config, &registry, false).unwrap();
    (pipeline, output_dir)
}

#[tokio::test]
async fn run_ping_older_than_timeout_is_reported_stale() {
    let dir = TempDir::new().unwrap();
    let (pipeline, output_dir) = build_pipeline(&dir);
    std::fs::create_dir_all(&output_dir).unwrap();
    write_run_ping(&output_dir, &RunId::new("r1"), "2020-01-01T00:00:00Z")
        .await
        .unwrap();

    let now = SystemTime::now() + Duration::from_secs(3600);
    let problems = find_stale_pings(&pipeline, Some(&Default::default()), Duration::from_secs(600), now);

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind, StaleKind::StaleRunPing);
}

#[tokio::test]
async fn fresh_run_ping_is_not_reported() {
    let dir = TempDir::new().unwrap();
    let (pipeline, output_dir) = build_pipeline(&dir);
    std::fs::create_dir_all(&output_dir).unwrap();
    write_run_ping(&output_dir, &RunId::new("r1"), "2026-01-01T00:00:00Z")
        .await
        .unwrap();

    let problems = find_stale_pings(
        &pipeline,
        Some(&Default::default()),
        Duration::from_secs(600),
        SystemTime::now(),
    );
    assert!(problems.is_empty());
}

#[tokio::test]
async fn queued_ping_with_dead_job_id_is_reported_stale() {
    let dir = TempDir::new().unwrap();
    let (pipeline, output_dir) = build_pipeline(&dir);
    std::fs::create_dir_all(&output_dir).unwrap();
    write_queued_ping(&output_dir, &RunId::new("r1"), "12345", "2026-01-01T00:00:00Z")
        .await
        .unwrap();

    let problems = find_stale_pings(
        &pipeline,
        Some(&Default::default()),
        Duration::from_secs(600),
        SystemTime::now(),
    );
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind, StaleKind::StaleQueuedPing);
}

#[tokio::test]
async fn queued_ping_with_live_job_id_is_never_reported() {
    let dir = TempDir::new().unwrap();
    let (pipeline, output_dir) = build_pipeline(&dir);
    std::fs::create_dir_all(&output_dir).unwrap();
    write_queued_ping(&output_dir, &RunId::new("r1"), "12345", "2026-01-01T00:00:00Z")
        .await
        .unwrap();

    let mut live = std::collections::HashSet::new();
    live.insert("12345".to_string());

    let problems = find_stale_pings(&pipeline, Some(&live), Duration::from_secs(600), SystemTime::now());
    assert!(problems.is_empty());
}

#[tokio::test]
async fn queued_ping_is_unevaluated_when_the_queue_cannot_be_probed() {
    let dir = TempDir::new().unwrap();
    let (pipeline, output_dir) = build_pipeline(&dir);
    std::fs::create_dir_all(&output_dir).unwrap();
    write_queued_ping(&output_dir, &RunId::new("r1"), "12345", "2026-01-01T00:00:00Z")
        .await
        .unwrap();

    let problems = find_stale_pings(&pipeline, None, Duration::from_secs(600), SystemTime::now());
    assert!(problems.is_empty());
}

#[tokio::test]
async fn remove_stale_pings_unlinks_the_flagged_files() {
    let dir = TempDir::new().unwrap();
    let (pipeline, output_dir) = build_pipeline(&dir);
    std::fs::create_dir_all(&output_dir).unwrap();
    write_run_ping(&output_dir, &RunId::new("r1"), "2020-01-01T00:00:00Z")
        .await
        .unwrap();

    let now = SystemTime::now() + Duration::from_secs(3600);
    let problems = find_stale_pings(&pipeline, Some(&Default::default()), Duration::from_secs(600), now);
    assert_eq!(problems.len(), 1);

    remove_stale_pings(&problems).await.unwrap();
    assert!(!problems[0].ping_path.exists());
}
