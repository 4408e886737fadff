// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Post-build install directives.

/// A single declarative filesystem/metadata change applied during
/// post-processing, in the order recipes list them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallDirective {
    /// Install a systemd unit file already present at the given out-tree path.
    SystemdUnit { path: String },
    /// Create a symlink `link -> target`, both relative to the package's
    /// `out/` tree.
    Symlink { link: String, target: String },
    /// Rename a file within the out tree.
    Rename { from: String, to: String },
    /// chmod a path to the given octal mode string (e.g. `"0755"`).
    Chmod { path: String, mode: String },
    /// Create an empty directory.
    EmptyDir { path: String },
    /// Delete a file or directory from the out tree before packaging.
    Delete { path: String },
    /// Grant a Linux capability to an installed binary (`setcap`).
    SetCap { path: String, capability: String },
}

/// The ordered list of install directives for a recipe.
pub type InstallSpec = Vec<InstallDirective>;
