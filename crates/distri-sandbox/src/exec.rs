// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Namespace entry, bind mounts, and chroot, grounded on spfs's own
//! `enter_mount_namespace`/capability-check discipline. None of this is
//! exercised by the test suite: it requires `CAP_SYS_ADMIN` and a Linux
//! kernel, the same constraint spfs's own `env.rs` tests operate under.

use std::io::Write;
use std::os::unix::fs::symlink as unix_symlink;
use std::path::Path;

use nix::mount::{MsFlags, mount};
use nix::sched::{CloneFlags, unshare};
use nix::unistd::{Gid, Uid, chdir, chroot};

use crate::error::{Error, Result};
use crate::plan::{BindMount, SandboxPlan, Symlink};

/// Create a fresh temporary sandbox root. Kept as a `tempfile::TempDir` so
/// it is removed automatically when the build driver drops it, guaranteeing
/// cleanup on all exit paths.
pub fn create_temp_root(full_name: &str) -> Result<tempfile::TempDir> {
    Ok(tempfile::Builder::new().prefix(&format!("distri-sandbox-{full_name}-")).tempdir()?)
}

/// Enter a fresh user + mount namespace, mapping the invoking uid/gid to 0
/// inside it. Must run while the process is still
/// single-threaded; `unshare(CLONE_NEWUSER)` fails otherwise.
pub fn enter_user_and_mount_namespace() -> Result<()> {
    tracing::debug!("entering user + mount namespace");
    unshare(CloneFlags::CLONE_NEWUSER | CloneFlags::CLONE_NEWNS)?;

    let uid = Uid::current();
    let gid = Gid::current();

    std::fs::write("/proc/self/setgroups", b"deny")?;
    let mut uid_map = std::fs::File::create("/proc/self/uid_map")?;
    write!(uid_map, "0 {uid} 1")?;
    let mut gid_map = std::fs::File::create("/proc/self/gid_map")?;
    write!(gid_map, "0 {gid} 1")?;

    Ok(())
}

/// Bind-mount `m.source` onto `m.target` (joined under `root`), remounting
/// read-only as a second pass when requested since Linux bind mounts ignore
/// `MS_RDONLY` on the initial call.
pub fn apply_bind_mount(root: &Path, m: &BindMount) -> Result<()> {
    let target = root.join(m.target.strip_prefix("/").unwrap_or(&m.target));
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if m.source.is_dir() {
        std::fs::create_dir_all(&target)?;
    } else {
        std::fs::File::create(&target)?;
    }

    const NONE: Option<&str> = None;
    mount(Some(&m.source), &target, NONE, MsFlags::MS_BIND, NONE)?;
    if m.read_only {
        mount(
            NONE,
            &target,
            NONE,
            MsFlags::MS_BIND | MsFlags::MS_REMOUNT | MsFlags::MS_RDONLY,
            NONE,
        )?;
    }
    Ok(())
}

pub fn apply_symlink(root: &Path, s: &Symlink) -> Result<()> {
    let link = root.join(s.link.strip_prefix("/").unwrap_or(&s.link));
    if let Some(parent) = link.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if link.symlink_metadata().is_ok() {
        std::fs::remove_file(&link)?;
    }
    unix_symlink(&s.target, &link)?;
    Ok(())
}

/// Write minimal `/etc/passwd`/`/etc/group` so language runtimes that look up
/// the current user succeed inside the sandbox.
pub fn write_minimal_user_db(root: &Path, uid: u32, gid: u32) -> Result<()> {
    std::fs::create_dir_all(root.join("etc"))?;
    std::fs::write(
        root.join("etc/passwd"),
        format!("root:x:{uid}:{gid}:root:/root:/bin/sh\n"),
    )?;
    std::fs::write(root.join("etc/group"), format!("root:x:{gid}:\n"))?;
    Ok(())
}

/// Apply a full sandbox plan under `root` and chroot into it.
pub fn enter_hermetic_sandbox(root: &Path, plan: &SandboxPlan, build_dir: &Path) -> Result<()> {
    let uid = Uid::current().as_raw();
    let gid = Gid::current().as_raw();
    write_minimal_user_db(root, uid, gid)?;

    for m in &plan.bind_mounts {
        apply_bind_mount(root, m)?;
    }
    for s in &plan.symlinks {
        apply_symlink(root, s)?;
    }

    let build_dir_in_root = root.join(build_dir.strip_prefix("/").unwrap_or(build_dir));
    std::fs::create_dir_all(&build_dir_in_root)?;

    chroot(root)?;
    chdir(build_dir)?;
    Ok(())
}

/// Apply the equivalent of a sandbox plan at fixed host paths, inside a
/// private mount namespace, without chrooting.
pub fn enter_nonhermetic_sandbox(plan: &SandboxPlan) -> Result<()> {
    unshare(CloneFlags::CLONE_NEWNS)?;
    for m in &plan.bind_mounts {
        apply_bind_mount(Path::new("/"), m)?;
    }
    for s in &plan.symlinks {
        apply_symlink(Path::new("/"), s)?;
    }
    Ok(())
}

/// Check the capabilities required to assemble a hermetic sandbox are
/// present; surfaced separately so callers can fail fast with a clear error
/// before doing any filesystem setup. `CLONE_NEWUSER` is designed to work
/// for an unprivileged caller (that's the whole point of mapping the
/// invoking uid/gid to 0 inside it), so root is not required; the one thing
/// actually worth checking ahead of time is that the kernel hasn't had
/// unprivileged user namespaces disabled.
pub fn check_can_sandbox() -> Result<()> {
    if nix::unistd::geteuid().is_root() {
        return Ok(());
    }
    let disabled = std::fs::read_to_string("/proc/sys/kernel/unprivileged_userns_clone")
        .map(|v| v.trim() == "0")
        .unwrap_or(false);
    if disabled {
        return Err(Error::MissingCapability("unprivileged user namespaces are disabled (kernel.unprivileged_userns_clone=0)"));
    }
    Ok(())
}
