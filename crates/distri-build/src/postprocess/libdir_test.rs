// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_curate_keeps_only_needed_and_owned_libraries() {
    let mut needed = BTreeSet::new();
    needed.insert("libz.so.1".to_string());
    needed.insert("libmystery.so.9".to_string());

    let mut real_paths = BTreeMap::new();
    real_paths.insert("libz.so.1".to_string(), PathBuf::from("/pkg/zlib/out/lib/libz.so.1.2.3"));
    real_paths.insert("libunused.so".to_string(), PathBuf::from("/pkg/other/out/lib/libunused.so"));

    let curated = curate(&needed, &real_paths);

    assert_eq!(curated.len(), 1);
    assert_eq!(curated.get("libz.so.1"), Some(&PathBuf::from("/pkg/zlib/out/lib/libz.so.1.2.3")));
}

#[test]
fn test_curate_empty_needed_yields_empty() {
    let needed = BTreeSet::new();
    let mut real_paths = BTreeMap::new();
    real_paths.insert("libz.so.1".to_string(), PathBuf::from("/pkg/zlib/out/lib/libz.so.1.2.3"));

    assert!(curate(&needed, &real_paths).is_empty());
}
