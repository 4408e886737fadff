// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! pkg-config `Requires:` scanning: one level
//! only, never transitive — pkg-config itself walks the rest.

#[cfg(test)]
#[path = "./pkgconfig_test.rs"]
mod pkgconfig_test;

const REQUIRES_PREFIXES: &[&str] = &["Requires:", "Requires.private:"];

/// Extract the module names referenced by `Requires:`/`Requires.private:`
/// lines in a `.pc` file, dropping any version comparison
/// (`glib-2.0 >= 2.40` yields `glib-2.0`).
pub fn parse_requires(pc_contents: &str) -> Vec<String> {
    let mut modules = Vec::new();
    for line in pc_contents.lines() {
        let line = line.trim();
        for prefix in REQUIRES_PREFIXES {
            if let Some(rest) = line.strip_prefix(prefix) {
                for token in rest.split(',') {
                    if let Some(name) = token.split_whitespace().next() {
                        modules.push(name.to_string());
                    }
                }
            }
        }
    }
    modules
}
