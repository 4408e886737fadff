// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! `Resolve`: the transitive runtime-dependency closure of a package set.

use std::collections::HashSet;

use crate::error::Result;
use crate::repo::Repo;

#[cfg(test)]
#[path = "./resolve_test.rs"]
mod resolve_test;

/// Depth-first transitive closure of `runtime_dep` edges starting from
/// `pkgs`, breaking cycles with a visited set and dropping self-edges.
///
/// `prune`, if given, names one package excluded from the closure entirely
/// (used so a split package does not end up depending on its own sibling).
/// The returned order is a stable preorder of the walk — sort explicitly if
/// a canonical order is needed.
pub fn resolve(repo: &dyn Repo, pkgs: &[String], prune: Option<&str>) -> Result<Vec<String>> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    for pkg in pkgs {
        walk(repo, pkg, prune, &mut visited, &mut order)?;
    }
    Ok(order)
}

fn walk(repo: &dyn Repo, name: &str, prune: Option<&str>, visited: &mut HashSet<String>, order: &mut Vec<String>) -> Result<()> {
    if prune == Some(name) {
        return Ok(());
    }
    if !visited.insert(name.to_string()) {
        return Ok(());
    }
    order.push(name.to_string());

    let meta = repo.read_meta(name)?;
    for dep in &meta.runtime_dep {
        if dep == name {
            continue;
        }
        walk(repo, dep, prune, visited, order)?;
    }
    Ok(())
}
