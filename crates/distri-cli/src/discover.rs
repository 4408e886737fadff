// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Enumerate recipes under a repo's `build/` tree and the published images
//! under its `pkg/` tree, for `distri batch`'s staleness check.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use distri_recipe::{Recipe, RecipeNode};

use crate::error::{Error, Result};

#[cfg(test)]
#[path = "./discover_test.rs"]
mod discover_test;

/// One recipe found on disk, with enough bookkeeping to build both a
/// [`RecipeNode`] for the scheduler and a [`distri_build::BuildContext`] for
/// the real build.
pub struct DiscoveredRecipe {
    pub pkg: String,
    pub pkg_dir: PathBuf,
    pub recipe_path: PathBuf,
    pub recipe: Recipe,
}

/// Walk `<repo_root>/build/*/build.textproto`, parsing each into a [`Recipe`].
/// A directory whose recipe fails to parse is skipped with a warning rather
/// than aborting the whole scan, so one broken recipe doesn't block a batch
/// run over everything else.
pub fn discover_recipes(repo_root: &Path) -> Result<Vec<DiscoveredRecipe>> {
    let build_root = repo_root.join("build");
    let mut out = Vec::new();
    if !build_root.is_dir() {
        return Ok(out);
    }

    for entry in std::fs::read_dir(&build_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let pkg_dir = entry.path();
        let recipe_path = pkg_dir.join("build.textproto");
        if !recipe_path.is_file() {
            continue;
        }
        let pkg = entry.file_name().to_string_lossy().into_owned();
        let text = std::fs::read_to_string(&recipe_path)?;
        match distri_recipe::parse_recipe(&pkg, &text) {
            Ok(recipe) => out.push(DiscoveredRecipe { pkg, pkg_dir, recipe_path, recipe }),
            Err(err) => tracing::warn!(pkg, %err, "skipping unparsable recipe"),
        }
    }

    Ok(out)
}

/// Find one recipe by short package name.
pub fn find_recipe<'a>(recipes: &'a [DiscoveredRecipe], pkg: &str) -> Result<&'a DiscoveredRecipe> {
    recipes.iter().find(|r| r.pkg == pkg).ok_or_else(|| Error::UnknownPackage(pkg.to_string()))
}

/// Build the scheduler's view of every discovered recipe, fully qualifying
/// each one against `arch`.
pub fn recipe_nodes(recipes: &[DiscoveredRecipe], arch: &str) -> Vec<RecipeNode> {
    recipes
        .iter()
        .enumerate()
        .map(|(id, r)| RecipeNode {
            id,
            pkg: r.pkg.clone(),
            full_name: format!("{}-{arch}-{}", r.pkg, r.recipe.version),
            version: r.recipe.version.clone(),
            deps: r.recipe.dep.clone(),
        })
        .collect()
}

/// Modification time of each recipe's `build.textproto`, keyed by package name.
pub fn recipe_mtimes(recipes: &[DiscoveredRecipe]) -> Result<BTreeMap<String, SystemTime>> {
    let mut out = BTreeMap::new();
    for r in recipes {
        let mtime = std::fs::metadata(&r.recipe_path)?.modified()?;
        out.insert(r.pkg.clone(), mtime);
    }
    Ok(out)
}

/// Modification time of each published image's meta file, keyed by its fully
/// qualified name. Missing entries (never built) are simply absent, which
/// `select_work_set` treats as always-stale.
pub fn image_mtimes(repo_root: &Path) -> Result<BTreeMap<String, SystemTime>> {
    let pkg_root = repo_root.join("pkg");
    let mut out = BTreeMap::new();
    if !pkg_root.is_dir() {
        return Ok(out);
    }
    for entry in std::fs::read_dir(&pkg_root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(full_name) = name.strip_suffix(".meta.textproto") else {
            continue;
        };
        let mtime = entry.metadata()?.modified()?;
        out.insert(full_name.to_string(), mtime);
    }
    Ok(out)
}
