// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Split-package claim partitioning. Walking the built
//! output tree and matching every file against each `split_package`'s globs,
//! first match wins, with an implicit `*` catch-all for everything no
//! explicit split package claimed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use distri_recipe::SplitPackage;

#[cfg(test)]
#[path = "./package_test.rs"]
mod package_test;

pub const CATCH_ALL: &str = "*";

/// Partition every relative path under `out_tree_paths` into the split
/// package whose first claim matches it, or [`CATCH_ALL`] if none do.
/// Later split packages never reclaim a path an earlier one already took.
pub fn partition_claims(split_packages: &[SplitPackage], out_tree_paths: &[PathBuf]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut result: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for sp in split_packages {
        result.entry(sp.name.clone()).or_default();
    }
    result.entry(CATCH_ALL.to_string()).or_default();

    'path: for path in out_tree_paths {
        for sp in split_packages {
            if sp.claims.iter().any(|claim| matches_claim(&claim.glob, path)) {
                result.get_mut(&sp.name).expect("inserted above").push(path.clone());
                continue 'path;
            }
        }
        result.get_mut(CATCH_ALL).expect("inserted above").push(path.clone());
    }
    result
}

fn matches_claim(glob_pattern: &str, path: &Path) -> bool {
    glob::Pattern::new(glob_pattern)
        .map(|pattern| pattern.matches_path(path))
        .unwrap_or(false)
}

/// The image file name for a split package: `<pkg>-<split-name>-...`, or
/// `<fullname>` itself for the catch-all.
pub fn image_name(full_name: &str, split_name: &str) -> String {
    if split_name == CATCH_ALL {
        full_name.to_string()
    } else {
        format!("{full_name}-{split_name}")
    }
}
