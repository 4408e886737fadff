// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! `Glob`: resolve a short package name to a fully-qualified one.

use distri_recipe::PackageIdent;

use crate::error::{Error, Result};
use crate::repo::Repo;

#[cfg(test)]
#[path = "./glob_test.rs"]
mod glob_test;

/// Resolve `short_name` to a fully-qualified name within `repo`.
///
/// `arch` is the arch to assume when `short_name` doesn't already name one.
/// In hermetic mode, failing to find any match is an error; in non-hermetic
/// mode it returns `Ok(None)` so the caller can fall back to a host tool.
pub fn glob(repo: &dyn Repo, short_name: &str, arch: &str, hermetic: bool) -> Result<Option<String>> {
    // (a) exact match.
    if repo.has_meta(short_name) {
        return Ok(Some(short_name.to_string()));
    }

    let ident = PackageIdent::parse(short_name).map_err(|_| Error::NotFound(short_name.to_string()))?;

    // (b) append the requested arch if the name doesn't already carry one.
    let with_arch = if ident.arch.is_none() {
        let candidate = format!("{short_name}-{arch}");
        if repo.has_meta(&candidate) {
            return Ok(Some(candidate));
        }
        candidate
    } else {
        short_name.to_string()
    };

    let target = PackageIdent::parse(&with_arch).map_err(|_| Error::NotFound(short_name.to_string()))?;

    // (c) enumerate candidates sharing the package name and arch.
    let mut matches: Vec<PackageIdent> = repo
        .list_matches(&target.pkg)?
        .into_iter()
        .filter_map(|name| PackageIdent::parse(&name).ok())
        .filter(|parsed| parsed.pkg == target.pkg && parsed.arch == target.arch)
        .collect();

    // (d) highest DistriRevision wins.
    matches.sort_by_key(|parsed| parsed.distri_revision.unwrap_or(i64::MIN));

    match matches.pop() {
        Some(winner) => Ok(Some(winner.to_string())),
        None if hermetic => Err(Error::NotFound(short_name.to_string())),
        None => Ok(None),
    }
}
