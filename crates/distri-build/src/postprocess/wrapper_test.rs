// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_generate_wrapper_source_embeds_target_and_env() {
    let mut env = BTreeMap::new();
    env.insert("LD_LIBRARY_PATH".to_string(), "/ro/zlib-amd64-1.2-3/out/lib".to_string());

    let source = generate_wrapper_source("/ro/hello-amd64-1.0-1/out/bin/hello", &env);

    assert!(source.contains("package main"));
    assert!(source.contains("/ro/hello-amd64-1.0-1/out/bin/hello"));
    assert!(source.contains("LD_LIBRARY_PATH"));
}

#[test]
fn test_extract_wrapper_target_round_trips() {
    let source = generate_wrapper_source("/ro/hello-amd64-1.0-1/out/bin/hello", &BTreeMap::new());
    assert_eq!(extract_wrapper_target(&source), Some("/ro/hello-amd64-1.0-1/out/bin/hello".to_string()));
}

#[test]
fn test_extract_wrapper_target_missing_marker_yields_none() {
    assert_eq!(extract_wrapper_target("package main\nfunc main() {}\n"), None);
}
