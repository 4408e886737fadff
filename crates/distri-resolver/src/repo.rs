// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! A directory of published `<fullname>.meta.textproto` files.

use std::path::{Path, PathBuf};

use distri_recipe::Meta;

use crate::error::{Error, Result};

#[cfg(test)]
#[path = "./repo_test.rs"]
mod repo_test;

/// A source of package metadata the resolver operations run against.
///
/// Kept as a trait (rather than hardcoding a filesystem directory) so tests
/// can exercise `glob`/`resolve` against an in-memory fixture without
/// touching disk, the same separation `distri-sandbox`'s `FuseControl` makes
/// for its own external collaborator.
pub trait Repo {
    /// True if a meta file for exactly this fully-qualified name exists.
    fn has_meta(&self, full_name: &str) -> bool;

    /// All fully-qualified names with a meta file whose name starts with
    /// `"{pkg}-"`. Callers filter this further by parsing each name.
    fn list_matches(&self, pkg: &str) -> Result<Vec<String>>;

    /// Read and parse the meta file for a fully-qualified name.
    fn read_meta(&self, full_name: &str) -> Result<Meta>;
}

/// A `Repo` backed by a directory of `.meta.textproto` files on disk.
pub struct FsRepo {
    root: PathBuf,
}

impl FsRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn meta_path(&self, full_name: &str) -> PathBuf {
        self.root.join(format!("{full_name}.meta.textproto"))
    }
}

fn full_name_from_meta_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    file_name.strip_suffix(".meta.textproto").map(str::to_string)
}

impl Repo for FsRepo {
    fn has_meta(&self, full_name: &str) -> bool {
        self.meta_path(full_name).is_file()
    }

    fn list_matches(&self, pkg: &str) -> Result<Vec<String>> {
        let pattern = self.root.join(format!("{pkg}-*.meta.textproto"));
        let pattern = pattern
            .to_str()
            .ok_or_else(|| Error::NotFound(pkg.to_string()))?;
        let mut out = Vec::new();
        for entry in glob::glob(pattern)? {
            let path = entry.map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
            if !path.is_file() {
                continue;
            }
            if let Some(full_name) = full_name_from_meta_path(&path) {
                out.push(full_name);
            }
        }
        Ok(out)
    }

    fn read_meta(&self, full_name: &str) -> Result<Meta> {
        let path = self.meta_path(full_name);
        if !path.is_file() {
            return Err(Error::MissingMeta(full_name.to_string()));
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(Meta::from_text(&path, &text)?)
    }
}
