// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Wrapper program generation: every program
//! under `out/bin` and `out/sbin` gets a small native executable in front of
//! it that sets the computed runtime environment and `exec`s the real
//! binary.
//!
//! The wrapper is compiled rather than hand-assembled: its source is
//! generated here and handed to the Go builder toolchain already wired up
//! in [`crate::builder_steps`], the same way the rest of this crate leans on
//! an existing language toolchain instead of emitting object code directly.
//! The real target path is also meant to live in a dedicated ELF section
//! recoverable by tooling; lacking an object-writing crate in the
//! dependency stack, this is approximated with a recognizable source marker
//! comment instead (see DESIGN.md).

use std::collections::BTreeMap;

#[cfg(test)]
#[path = "./wrapper_test.rs"]
mod wrapper_test;

pub const WRAPPER_TARGET_MARKER: &str = "// distri-wrapper-target: ";

/// Generate the Go source for a wrapper that `exec`s `target`, prepending
/// `extra_env` onto whatever the wrapper inherits.
pub fn generate_wrapper_source(target: &str, extra_env: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str("package main\n\n");
    out.push_str("import (\n\t\"os\"\n\t\"syscall\"\n)\n\n");
    out.push_str(&format!("{WRAPPER_TARGET_MARKER}{target}\n"));
    out.push_str("func main() {\n");
    for (key, value) in extra_env {
        out.push_str(&format!(
            "\tos.Setenv({key:?}, {value:?}+string(os.PathListSeparator)+os.Getenv({key:?}))\n"
        ));
    }
    out.push_str(&format!("\targv := append([]string{{{target:?}}}, os.Args[1:]...)\n"));
    out.push_str(&format!("\tif err := syscall.Exec({target:?}, argv, os.Environ()); err != nil {{\n"));
    out.push_str("\t\tpanic(err)\n\t}\n");
    out.push_str("}\n");
    out
}

/// Recover a wrapper's embedded target path from its generated source, the
/// way tooling inspecting an already-built wrapper would.
pub fn extract_wrapper_target(source: &str) -> Option<String> {
    source
        .lines()
        .find_map(|line| line.strip_prefix(WRAPPER_TARGET_MARKER))
        .map(str::to_string)
}
