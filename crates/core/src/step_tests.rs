// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::id::ModuleName;

fn step(deps: Vec<&str>) -> Step {
    Step {
        step_name: StepName::new("align"),
        module_name: ModuleName::new("bowtie2"),
        options: serde_json::json!({}),
        dependencies: deps.into_iter().map(StepName::new).collect(),
        required_tools: vec![],
        cores: 1,
    }
}

#[test]
fn no_dependencies_is_source() {
    assert!(step(vec![]).is_source());
}

#[test]
fn with_dependencies_is_not_source() {
    assert!(!step(vec!["trim"]).is_source());
}
