// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! ELF `DT_NEEDED` extraction.

use std::collections::BTreeMap;

#[cfg(test)]
#[path = "./elf_deps_test.rs"]
mod elf_deps_test;

/// The shared-library names an ELF file's dynamic section requires.
/// `None` when `bytes` doesn't parse as an ELF at all — the caller skips
/// that file with a warning rather than treating it as an error, since an
/// `out/` tree legitimately contains non-ELF files (scripts, data).
pub fn needed_libraries(bytes: &[u8]) -> Option<Vec<String>> {
    match goblin::Object::parse(bytes).ok()? {
        goblin::Object::Elf(elf) => Some(elf.libraries.iter().map(|s| s.to_string()).collect()),
        _ => None,
    }
}

/// Resolve each needed library name to its owning package via an already
/// materialized `library file name -> full name` map (built by scanning
/// `/ro/*/out/lib` during sandbox setup). Unresolved names are returned
/// separately so the caller can log them rather than fail the build.
pub fn resolve_owners(needed: &[String], lib_owners: &BTreeMap<String, String>) -> (Vec<String>, Vec<String>) {
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();
    for lib in needed {
        match lib_owners.get(lib) {
            Some(full_name) => resolved.push(full_name.clone()),
            None => unresolved.push(lib.clone()),
        }
    }
    (resolved, unresolved)
}
