// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Per-build environment variable computation.

use std::collections::BTreeMap;

use distri_recipe::PackageIdent;

use crate::context::BuildContext;

#[cfg(test)]
#[path = "./env_test.rs"]
mod env_test;

/// Path-shaped environment variables that are concatenated across resolved
/// dependencies rather than simply set once.
const PATH_VARS: &[&str] = &["PATH", "LIBRARY_PATH", "LD_LIBRARY_PATH", "CPATH", "PKG_CONFIG_PATH", "PERL5LIB", "PYTHONPATH"];

/// Where a path variable looks for its dependency's contribution, relative
/// to `/ro/<fullname>`.
fn subdir_for(var: &str) -> &'static str {
    match var {
        "PATH" => "out/bin",
        "LIBRARY_PATH" | "LD_LIBRARY_PATH" => "out/lib",
        "CPATH" => "out/include",
        "PKG_CONFIG_PATH" => "out/lib/pkgconfig",
        "PERL5LIB" => "out/lib/perl5",
        "PYTHONPATH" => "out/lib/python",
        other => unreachable!("not a path variable: {other}"),
    }
}

/// Order `full_name`s for path-variable concatenation: insertion order of
/// distinct packages is preserved, but when the same package appears more
/// than once (different revisions reachable through different edges) the
/// higher revision sorts first.
pub fn order_deps_for_path_vars(full_names: &[String]) -> Vec<String> {
    let parsed: Vec<(String, PackageIdent)> = full_names
        .iter()
        .filter_map(|n| PackageIdent::parse(n).ok().map(|id| (n.clone(), id)))
        .collect();

    let mut first_seen: BTreeMap<String, usize> = BTreeMap::new();
    for (idx, (_, id)) in parsed.iter().enumerate() {
        first_seen.entry(id.pkg.clone()).or_insert(idx);
    }

    let mut ordered = parsed;
    ordered.sort_by(|(_, a), (_, b)| {
        first_seen[&a.pkg]
            .cmp(&first_seen[&b.pkg])
            .then(b.distri_revision.cmp(&a.distri_revision))
    });
    ordered.into_iter().map(|(name, _)| name).collect()
}

fn join_path_var(deps: &[String], var: &str) -> String {
    deps.iter()
        .map(|full_name| format!("/ro/{full_name}/{}", subdir_for(var)))
        .collect::<Vec<_>>()
        .join(":")
}

/// Compute the `LDFLAGS` for a build: an rpath to the package's own lib
/// directory plus `--dynamic-linker=` pointing at the resolved C library's
/// loader, except for the C library's own build (a self-rpath would be
/// circular).
pub fn compute_ldflags(ctx: &BuildContext, libc_full_name: Option<&str>) -> String {
    if Some(ctx.full_name().as_str()) == libc_full_name {
        return String::new();
    }
    let mut flags = format!("-Wl,-rpath,{}{}/lib", ctx.dest_dir.display(), ctx.prefix);
    if let Some(libc) = libc_full_name {
        flags.push_str(&format!(" -Wl,--dynamic-linker=/ro/{libc}/out/lib/ld.so"));
    }
    flags
}

/// Build the full environment for a build step, given the transitive
/// dependency closure (already ordered by [`order_deps_for_path_vars`]) and
/// the resolved C library, if any (absent only when building the C library
/// itself or a package with no runtime deps at all).
pub fn compute_env(ctx: &BuildContext, ordered_deps: &[String], libc_full_name: Option<&str>, jobs: u32) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    for var in PATH_VARS {
        env.insert((*var).to_string(), join_path_var(ordered_deps, var));
    }
    env.insert("LDFLAGS".to_string(), compute_ldflags(ctx, libc_full_name));
    env.insert("DESTDIR".to_string(), ctx.dest_dir.display().to_string());
    env.insert("DISTRI_DESTDIR".to_string(), ctx.dest_dir.display().to_string());
    env.insert("DISTRI_PREFIX".to_string(), ctx.prefix.clone());
    env.insert("DISTRI_BUILDDIR".to_string(), ctx.build_dir.display().to_string());
    env.insert("DISTRI_SOURCEDIR".to_string(), ctx.source_dir.display().to_string());
    env.insert("DISTRI_FULLNAME".to_string(), ctx.full_name());
    env.insert("DISTRI_JOBS".to_string(), jobs.to_string());
    env.insert("DISTRI_BUILD_PROCESS".to_string(), "1".to_string());
    env
}

/// Expand `${DISTRI_RESOLVE:pkg}` references in `template` against an
/// already-resolved `pkg -> full_name` map; every other `${VAR}` reference is
/// substituted from `env`. Unknown references are left untouched rather than
/// erroring, since a recipe may legitimately reference a shell-provided
/// variable the driver does not set.
pub fn expand_vars(template: &str, env: &BTreeMap<String, String>, resolved: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let name = &after[..end];
        let value = if let Some(pkg) = name.strip_prefix("DISTRI_RESOLVE:") {
            resolved.get(pkg).cloned()
        } else {
            env.get(name).cloned()
        };
        match value {
            Some(v) => out.push_str(&v),
            None => {
                out.push_str("${");
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
