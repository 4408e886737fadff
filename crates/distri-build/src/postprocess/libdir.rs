// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Curated `lib/` directory: replace a package's full dependency `lib`
//! view with a directory containing symlinks to only the libraries it
//! actually needs, each pointing past any intermediate symlink straight at
//! the file that owns it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[cfg(test)]
#[path = "./libdir_test.rs"]
mod libdir_test;

/// `needed` library file names, narrowed to the ones `lib_real_paths` (a
/// symlink-resolved `file name -> real path` map built from the resolved
/// dependency closure) actually owns. A name with no known owner is
/// dropped, the same as an unresolved ELF dependency elsewhere in
/// post-processing.
pub fn curate(needed: &BTreeSet<String>, lib_real_paths: &BTreeMap<String, PathBuf>) -> BTreeMap<String, PathBuf> {
    needed.iter().filter_map(|name| lib_real_paths.get(name).map(|path| (name.clone(), path.clone()))).collect()
}
