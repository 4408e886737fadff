// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! The `build.textproto` document.

use crate::builder::Builder;
use crate::cherry_pick::CherryPick;
use crate::install::InstallSpec;
use crate::source::Source;
use crate::split_package::{RuntimeUnion, SplitPackage};
use crate::version::Version;

#[cfg(test)]
#[path = "./recipe_test.rs"]
mod recipe_test;

/// A structured description of one source package, read once from disk at
/// build start and immutable for the duration of the build.
#[derive(Clone, Debug, PartialEq)]
pub struct Recipe {
    /// The source package name (directory name under the repo's recipe
    /// tree); not itself part of `build.textproto` but supplied by the
    /// caller when a recipe is loaded.
    pub pkg: String,
    pub source: Source,
    /// Hex-encoded SHA-256 of the downloaded artifact.
    pub hash: String,
    pub version: Version,
    pub builder: Builder,
    pub dep: Vec<String>,
    pub runtime_dep: Vec<String>,
    pub cherry_pick: Vec<CherryPick>,
    pub extra_file: Vec<String>,
    pub install: InstallSpec,
    pub split_package: Vec<SplitPackage>,
    pub runtime_union: Vec<RuntimeUnion>,
}

impl Recipe {
    /// The per-builder constant set of additional build dependencies pulled
    /// in regardless of what the recipe itself declares:
    /// "the C builder pulls in the configure-runtime tools plus a C
    /// toolchain; cross-builds also add a native toolchain because
    /// generated code at build time still runs on the host."
    pub fn builder_deps(&self, cross_arch: Option<&str>, native_arch: &str) -> Vec<String> {
        let mut deps: Vec<String> = match &self.builder {
            Builder::C(cfg) => {
                let mut deps = vec!["bash".to_string(), "coreutils".to_string(), "gcc".to_string(), "make".to_string()];
                if cfg.autoreconf {
                    deps.extend([
                        "autoconf".to_string(),
                        "automake".to_string(),
                        "libtool".to_string(),
                        "gettext".to_string(),
                    ]);
                }
                deps
            }
            Builder::CMake(_) => vec!["cmake".to_string(), "ninja".to_string(), "gcc".to_string()],
            Builder::Meson(_) => vec!["meson".to_string(), "ninja".to_string(), "gcc".to_string()],
            Builder::Perl(_) => vec!["perl".to_string(), "make".to_string()],
            Builder::Python(_) => vec!["python3".to_string()],
            Builder::Go(_) | Builder::Gomod(_) => vec!["go".to_string()],
            Builder::Steps(_) => vec!["bash".to_string(), "coreutils".to_string()],
        };

        // A cross-build for a non-native arch still pulls in the native
        // toolchain: build-time code generators run on the host, not the
        // target, preserved as an open question.
        if let Some(cross_arch) = cross_arch {
            if cross_arch != native_arch {
                deps.push(format!("gcc-{native_arch}"));
            }
        }

        deps
    }

    /// The effective build-dep set before resolution: `builder_deps(recipe)
    /// ∪ recipe.dep ∪ recipe.runtime_dep`.
    pub fn effective_build_deps(&self, cross_arch: Option<&str>, native_arch: &str) -> Vec<String> {
        let mut deps = self.builder_deps(cross_arch, native_arch);
        for d in self.dep.iter().chain(self.runtime_dep.iter()) {
            if !deps.contains(d) {
                deps.push(d.clone());
            }
        }
        deps
    }
}
