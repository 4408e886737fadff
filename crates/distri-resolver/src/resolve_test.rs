// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use distri_recipe::{Meta, Version};

use super::*;
use crate::fixtures::FakeRepo;

fn meta(runtime_dep: Vec<&str>) -> Meta {
    Meta {
        runtime_dep: runtime_dep.into_iter().map(String::from).collect(),
        source_pkg: "pkg".into(),
        version: Version::new("1", 1),
        runtime_union: vec![],
        input_digest: "x".into(),
    }
}

#[test]
fn test_transitive_closure_is_preorder() {
    let repo = FakeRepo::new()
        .with("a", meta(vec!["b", "c"]))
        .with("b", meta(vec!["d"]))
        .with("c", meta(vec![]))
        .with("d", meta(vec![]));
    let closure = resolve(&repo, &["a".to_string()], None).unwrap();
    assert_eq!(closure, vec!["a", "b", "d", "c"]);
}

#[test]
fn test_cycle_is_broken_by_visited_set() {
    let repo = FakeRepo::new().with("a", meta(vec!["b"])).with("b", meta(vec!["a"]));
    let closure = resolve(&repo, &["a".to_string()], None).unwrap();
    assert_eq!(closure, vec!["a", "b"]);
}

#[test]
fn test_self_edge_is_dropped() {
    let repo = FakeRepo::new().with("a", meta(vec!["a"]));
    let closure = resolve(&repo, &["a".to_string()], None).unwrap();
    assert_eq!(closure, vec!["a"]);
}

#[test]
fn test_prune_excludes_named_package_from_closure() {
    let repo = FakeRepo::new()
        .with("a", meta(vec!["b", "c"]))
        .with("b", meta(vec![]))
        .with("c", meta(vec![]));
    let closure = resolve(&repo, &["a".to_string()], Some("c")).unwrap();
    assert_eq!(closure, vec!["a", "b"]);
}

#[test]
fn test_missing_meta_is_reported() {
    let repo = FakeRepo::new().with("a", meta(vec!["ghost"]));
    let err = resolve(&repo, &["a".to_string()], None).unwrap_err();
    assert!(matches!(err, Error::MissingMeta(_)));
}

#[test]
fn test_multiple_roots_dedupe_shared_dependency() {
    let repo = FakeRepo::new()
        .with("a", meta(vec!["shared"]))
        .with("b", meta(vec!["shared"]))
        .with("shared", meta(vec![]));
    let closure = resolve(&repo, &["a".to_string(), "b".to_string()], None).unwrap();
    assert_eq!(closure, vec!["a", "shared", "b"]);
}
