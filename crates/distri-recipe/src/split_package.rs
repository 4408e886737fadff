// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Split packages and runtime unions.

/// One file-glob claim within a [`SplitPackage`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    /// A glob rooted at the build's `out/` directory, e.g. `out/lib/*.so*`.
    pub glob: String,
}

/// An additional output image carved out of a single build by claiming a set
/// of files via glob. The implicit `*` catch-all package (everything no
/// split package claimed) is not represented here; the build driver
/// synthesizes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitPackage {
    pub name: String,
    pub claims: Vec<Claim>,
}

/// A directory merged at runtime from another package into this package's
/// own tree (e.g. locale data, terminfo).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeUnion {
    pub name: String,
    pub dirs: Vec<String>,
}
