// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Package identifiers: `pkg-arch-upstream-revision`, e.g. `gcc-amd64-8.2.0-3`.
//!
//! A short name may omit the architecture and/or the revision; the resolver
//! (`distri-resolver`) is responsible for filling those in against a
//! concrete repository. Parsing a short name here never fails on a missing
//! arch/revision — it only fails when the string cannot be a package name at
//! all (empty).

use std::fmt;

use crate::error::{Error, Result};
use crate::version::Version;

#[cfg(test)]
#[path = "./ident_test.rs"]
mod ident_test;

/// Architectures recognized when splitting a fully-qualified name. A real
/// deployment would source this from the active build's target triple list;
/// it is hardcoded here because the full name grammar is ambiguous without
/// it (package names may themselves contain hyphens, e.g. `glibc-dev`) and
/// the original Go sources distri's format was distilled from were not
/// available to disambiguate further (see DESIGN.md).
const KNOWN_ARCHES: &[&str] = &["amd64", "arm64", "i386", "riscv64"];

/// A parsed package identifier, either fully-qualified or a short name with
/// some components left for the resolver to fill in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackageIdent {
    pub pkg: String,
    pub arch: Option<String>,
    pub upstream: Option<String>,
    pub distri_revision: Option<i64>,
}

impl PackageIdent {
    /// True once every optional field is present, i.e. this identifier names
    /// exactly one package build rather than a family of them.
    pub fn is_fully_qualified(&self) -> bool {
        self.arch.is_some() && self.upstream.is_some() && self.distri_revision.is_some()
    }

    pub fn version(&self) -> Option<Version> {
        Some(Version {
            upstream: self.upstream.clone()?,
            distri_revision: self.distri_revision?,
        })
    }

    /// Parse a `pkg-arch-upstream-revision` string, any suffix of which may
    /// be missing (working right-to-left: trailing integer is the revision,
    /// then a recognized arch token, then the rest is upstream/pkg).
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::MalformedIdent(s.to_string()));
        }
        let mut parts: Vec<&str> = s.split('-').collect();

        let distri_revision = match parts.last().and_then(|p| p.parse::<i64>().ok()) {
            Some(rev) if parts.len() > 1 => {
                parts.pop();
                Some(rev)
            }
            _ => None,
        };

        // Find the rightmost recognized arch token; everything after it
        // (if any) is the upstream version, everything before it is the
        // package name.
        let arch_idx = parts
            .iter()
            .enumerate()
            .rev()
            .find(|(_, p)| KNOWN_ARCHES.contains(p))
            .map(|(i, _)| i);

        let (pkg_parts, arch, upstream_parts): (&[&str], Option<&str>, &[&str]) = match arch_idx {
            Some(i) => (&parts[..i], Some(parts[i]), &parts[i + 1..]),
            None => (&parts[..], None, &[]),
        };

        if pkg_parts.is_empty() {
            return Err(Error::MalformedIdent(s.to_string()));
        }

        let upstream = if upstream_parts.is_empty() {
            None
        } else {
            Some(upstream_parts.join("-"))
        };

        Ok(PackageIdent {
            pkg: pkg_parts.join("-"),
            arch: arch.map(str::to_string),
            upstream,
            distri_revision,
        })
    }

    /// Build a fully-qualified identifier directly, skipping the ambiguous
    /// string grammar.
    pub fn fully_qualified(pkg: impl Into<String>, arch: impl Into<String>, version: Version) -> Self {
        Self {
            pkg: pkg.into(),
            arch: Some(arch.into()),
            upstream: Some(version.upstream),
            distri_revision: Some(version.distri_revision),
        }
    }
}

impl fmt::Display for PackageIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pkg)?;
        if let Some(arch) = &self.arch {
            write!(f, "-{arch}")?;
        }
        if let (Some(upstream), Some(rev)) = (&self.upstream, self.distri_revision) {
            write!(f, "-{upstream}-{rev}")?;
        }
        Ok(())
    }
}

/// Ordering: lexical on `pkg`, then numeric on `distri_revision` (higher is
/// newer). Identifiers missing a revision sort before ones that have it.
impl Ord for PackageIdent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.pkg
            .cmp(&other.pkg)
            .then(self.distri_revision.cmp(&other.distri_revision))
    }
}

impl PartialOrd for PackageIdent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
