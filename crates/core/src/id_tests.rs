// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::borrow::Borrow;
use std::collections::HashMap;

#[test]
fn new_and_as_str() {
    let id = StepName::new("align");
    assert_eq!(id.as_str(), "align");
}

#[test]
fn display() {
    let id = RunId::new("sample-1");
    assert_eq!(format!("{}", id), "sample-1");
    assert_eq!(id.to_string(), "sample-1");
}

#[test]
fn from_string_and_str() {
    let a: ModuleName = String::from("fastqc").into();
    let b: ModuleName = "fastqc".into();
    assert_eq!(a, b);
}

#[test]
fn partial_eq_str() {
    let id = ConnectionTag::new("reads");
    assert_eq!(id, *"reads");
    assert_eq!(id, "reads");
}

#[test]
fn borrow_str_for_hashmap_lookup() {
    let mut map = HashMap::new();
    map.insert(StepName::new("trim"), 1);
    let key: &str = "trim";
    assert_eq!(map.get(key), Some(&1));
    let borrowed: &str = StepName::new("trim").borrow();
    assert_eq!(borrowed, "trim");
}

#[test]
fn ordering_is_lexicographic_on_inner_string() {
    let mut names = vec![StepName::new("c"), StepName::new("a"), StepName::new("b")];
    names.sort();
    assert_eq!(
        names,
        vec![StepName::new("a"), StepName::new("b"), StepName::new("c")]
    );
}
