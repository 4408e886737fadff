// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::builder::CConfig;

fn trivial_recipe(builder: Builder) -> Recipe {
    Recipe {
        pkg: "hello".into(),
        source: Source::Empty,
        hash: "0".repeat(64),
        version: Version::new("1", 1),
        builder,
        dep: vec![],
        runtime_dep: vec![],
        cherry_pick: vec![],
        extra_file: vec![],
        install: vec![],
        split_package: vec![],
        runtime_union: vec![],
    }
}

#[test]
fn test_c_builder_deps_without_autoreconf() {
    let recipe = trivial_recipe(Builder::C(CConfig::default()));
    let deps = recipe.builder_deps(None, "amd64");
    assert!(deps.contains(&"gcc".to_string()));
    assert!(!deps.contains(&"autoconf".to_string()));
}

#[test]
fn test_c_builder_deps_with_autoreconf() {
    let recipe = trivial_recipe(Builder::C(CConfig {
        autoreconf: true,
        ..Default::default()
    }));
    let deps = recipe.builder_deps(None, "amd64");
    for tool in ["autoconf", "automake", "libtool", "gettext"] {
        assert!(deps.contains(&tool.to_string()), "missing {tool}");
    }
}

#[test]
fn test_cross_build_still_pulls_in_native_toolchain() {
    let recipe = trivial_recipe(Builder::C(CConfig::default()));
    let deps = recipe.builder_deps(Some("arm64"), "amd64");
    assert!(deps.iter().any(|d| d == "gcc-amd64"));
}

#[test]
fn test_native_build_does_not_add_cross_toolchain_entry() {
    let recipe = trivial_recipe(Builder::C(CConfig::default()));
    let deps = recipe.builder_deps(Some("amd64"), "amd64");
    assert!(!deps.iter().any(|d| d == "gcc-amd64"));
}

#[test]
fn test_effective_build_deps_dedupes_and_unions_runtime_deps() {
    let mut recipe = trivial_recipe(Builder::C(CConfig::default()));
    recipe.dep = vec!["gcc".to_string(), "pkg-config".to_string()];
    recipe.runtime_dep = vec!["zlib".to_string()];
    let deps = recipe.effective_build_deps(None, "amd64");
    assert_eq!(deps.iter().filter(|d| *d == "gcc").count(), 1);
    assert!(deps.contains(&"pkg-config".to_string()));
    assert!(deps.contains(&"zlib".to_string()));
}
