// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! The sandbox layout as pure data, kept separate from the namespace
//! and mount syscalls in [`crate::exec`] so it can be built and inspected
//! without root or a Linux kernel at hand.

use std::path::PathBuf;

#[cfg(test)]
#[path = "./plan_test.rs"]
mod plan_test;

/// A read-only or read-write bind mount from the host into the sandbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindMount {
    pub source: PathBuf,
    /// Path inside the sandbox, relative to its eventual chroot root.
    pub target: PathBuf,
    pub read_only: bool,
}

/// A symlink created inside the sandbox before chrooting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symlink {
    /// Path inside the sandbox, relative to its eventual chroot root.
    pub link: PathBuf,
    pub target: PathBuf,
}

/// Everything needed to plan one build's sandbox, independent of whether it
/// ends up hermetic (chrooted) or not.
#[derive(Clone, Debug)]
pub struct SandboxContext {
    pub full_name: String,
    /// The resolved C library's fully-qualified name, used for the `/lib64`
    /// symlink.
    pub libc_full_name: String,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// `<package_dir>/wrappers`, if that directory exists for this recipe.
    pub wrappers_dir: Option<PathBuf>,
    pub hermetic: bool,
}

/// The concrete set of bind mounts and symlinks a sandbox needs, in the
/// order they must be applied (mounts before the symlinks that traverse
/// them, in dependency order).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SandboxPlan {
    pub bind_mounts: Vec<BindMount>,
    pub symlinks: Vec<Symlink>,
}

/// These paths are constants, not derived from any per-build identifier
/// other than `full_name`, so the same recipe always sees the same sandbox
/// layout.
pub fn plan_sandbox(ctx: &SandboxContext) -> SandboxPlan {
    let mut bind_mounts = vec![
        BindMount {
            source: PathBuf::from("/dev/null"),
            target: PathBuf::from("/dev/null"),
            read_only: false,
        },
        BindMount {
            source: PathBuf::from("/dev/tty"),
            target: PathBuf::from("/dev/tty"),
            read_only: false,
        },
        BindMount {
            source: ctx.source_dir.clone(),
            target: PathBuf::from("/usr/src").join(&ctx.full_name),
            read_only: true,
        },
    ];

    if let Some(wrappers) = &ctx.wrappers_dir {
        bind_mounts.push(BindMount {
            source: wrappers.clone(),
            target: PathBuf::from("/usr/src/wrappers"),
            read_only: true,
        });
    }

    bind_mounts.push(BindMount {
        source: ctx.dest_dir.clone(),
        target: PathBuf::from("/dest/tmp"),
        read_only: false,
    });
    bind_mounts.push(BindMount {
        source: ctx.dest_dir.clone(),
        target: PathBuf::from("/ro").join(&ctx.full_name),
        read_only: false,
    });

    let symlinks = vec![
        Symlink {
            link: PathBuf::from("/bin"),
            target: PathBuf::from("/ro/bin"),
        },
        Symlink {
            link: PathBuf::from("/usr/bin"),
            target: PathBuf::from("/ro/bin"),
        },
        Symlink {
            link: PathBuf::from("/sbin"),
            target: PathBuf::from("/ro/bin"),
        },
        Symlink {
            link: PathBuf::from("/lib64"),
            target: PathBuf::from("/ro").join(&ctx.libc_full_name).join("out/lib"),
        },
        Symlink {
            link: PathBuf::from("/usr/share"),
            target: PathBuf::from("/ro/share"),
        },
    ];

    SandboxPlan { bind_mounts, symlinks }
}

/// Exchange-directory shadow symlinks: for each directory name
/// in `allowlist` (e.g. `lib`, `share`), a package that installs into
/// `/<dir>` actually populates its own `out/<dir>` tree, which is then
/// exposed at `/<dir>` through this symlink.
pub fn exchange_dir_symlinks(full_name: &str, allowlist: &[String]) -> Vec<Symlink> {
    allowlist
        .iter()
        .map(|dir| Symlink {
            link: PathBuf::from("/").join(dir),
            target: PathBuf::from("/ro").join(full_name).join("out").join(dir),
        })
        .collect()
}
