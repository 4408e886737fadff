// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Materializing a parsed [`distri_recipe::Source`] into a build's source
//! directory. The network- and module-tool-backed variants sit
//! behind [`SourceFetcher`] so the orchestration in [`crate::driver`] can be
//! exercised without either.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[cfg(test)]
#[path = "./fetch_test.rs"]
mod fetch_test;

/// The collaborators a `distri+gomod://` or `distri+source://` source needs
/// that this crate cannot provide on its own: a language module tool and
/// access to another package's already-published `src` image.
pub trait SourceFetcher {
    /// Fetch and repackage a Go module into a tarball's bytes, the way
    /// `go mod download` plus `go mod vendor` would produce one.
    fn fetch_gomod(&self, import_path: &str, version: &str) -> Result<Vec<u8>>;
    /// Resolve another package's already-built `src` image to a path this
    /// build can copy from.
    fn locate_src_image(&self, full_name: &str) -> Result<PathBuf>;
}

/// Copy an in-tree source directory into `dest`, skipping version-control
/// metadata. `distriroot://` sources are never downloaded or hashed; they
/// track whatever is on disk at build time.
pub fn sync_distriroot(path: &Path, dest: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::SourceFailed(format!("distriroot source {} is not a directory", path.display())));
    }
    for entry in walkdir::WalkDir::new(path) {
        let entry = entry.map_err(|e| Error::SourceFailed(e.to_string()))?;
        if entry.path().components().any(|c| c.as_os_str() == ".git") {
            continue;
        }
        let relative = entry.path().strip_prefix(path).expect("walkdir yields entries under path");
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// `empty://` materializes to an empty directory.
pub fn materialize_empty(dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    Ok(())
}

/// Copy another package's `src` image contents into this build's source
/// directory for `distri+source://`.
pub fn reuse_src_image(src_image_dir: &Path, dest: &Path) -> Result<()> {
    sync_distriroot(src_image_dir, dest)
}

/// Set a just-fetched `distri+gomod://` tree's mtime to the module's release
/// timestamp, so the repackaged tarball is reproducible regardless of when
/// the fetch happened to run.
pub fn set_gomod_release_mtime(path: &Path, unix_seconds: i64) -> Result<()> {
    let timestamp = chrono::DateTime::from_timestamp(unix_seconds, 0)
        .ok_or_else(|| Error::SourceFailed(format!("invalid gomod release timestamp {unix_seconds}")))?;
    let system_time = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(timestamp.timestamp() as u64);
    let file = std::fs::File::options().write(true).open(path)?;
    file.set_modified(system_time)?;
    Ok(())
}
