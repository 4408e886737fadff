// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! `distri build`: build exactly one package.

use std::io::Write;

use clap::Args;

use crate::discover;
use crate::error::{Error, Result};
use crate::pipeline::{self, BuildOptions};

#[cfg(test)]
#[path = "./cmd_build_test.rs"]
mod cmd_build_test;

#[derive(Args, Debug)]
pub struct Build {
    /// Package to build, e.g. `zlib` or `zlib-amd64`.
    #[arg(long = "pkg")]
    pub pkg: String,

    /// Build inside the hermetic chroot sandbox.
    #[arg(long = "hermetic", default_value_t = true, action = clap::ArgAction::Set)]
    pub hermetic: bool,

    /// Prefer the FUSE dependency union over individual bind mounts.
    #[arg(long = "fuse", default_value_t = true, action = clap::ArgAction::Set)]
    pub fuse: bool,

    /// Cross-compile for this target architecture instead of the host's.
    #[arg(long = "cross")]
    pub cross: Option<String>,

    /// Parallel job count passed through as `${DISTRI_JOBS}`; defaults to config.
    #[arg(long = "jobs")]
    pub jobs: Option<u32>,

    /// Delegate the build to a remote builder at `HOST:PORT` instead of
    /// running it locally. No transport is wired up yet, so this currently
    /// only logs a warning and continues locally.
    #[arg(long = "remote")]
    pub remote: Option<String>,

    /// Drop into an interactive shell in the build directory if a build step
    /// fails, when set to `after-steps`.
    #[arg(long = "debug")]
    pub debug: Option<String>,
}

pub fn run(args: &Build) -> Result<()> {
    let config = distri_config::Config::current()?;
    let repo_root = config.repo_root()?;

    if let Some(remote) = &args.remote {
        tracing::warn!(remote, "remote builder support is not wired to a transport; building locally");
    }

    let ident = distri_recipe::PackageIdent::parse(&args.pkg)?;
    let recipes = discover::discover_recipes(&repo_root)?;
    let found = discover::find_recipe(&recipes, &ident.pkg)?;

    let arch = ident.arch.clone().unwrap_or_else(|| config.repo.arch.clone());
    let pkg_root = repo_root.join("pkg");
    let repo = distri_resolver::FsRepo::new(pkg_root.clone());
    let opts = BuildOptions {
        arch,
        hermetic: args.hermetic,
        fuse: args.fuse,
        cross: args.cross.clone(),
        jobs: args.jobs.unwrap_or(config.build.jobs),
        native_arch: config.repo.arch.clone(),
        bind_mount_allowlist: config.sandbox.bind_mount_allowlist.clone(),
        pkg_root,
    };

    match pipeline::run(found, &repo, &opts) {
        Ok(images) => {
            for image in images {
                println!("{}", image.display());
            }
            Ok(())
        }
        Err(err @ Error::Build(distri_build::Error::BuildStepFailed { .. })) if args.debug.as_deref() == Some("after-steps") => {
            open_debug_shell(&found.pkg_dir.join("build"));
            Err(err)
        }
        Err(err) => Err(err),
    }
}

/// Drop into an interactive shell rooted at `build_dir` so a failed step can
/// be re-run and inspected by hand. Best-effort: a failure to
/// spawn the shell itself is logged, not propagated, since the caller is
/// already unwinding with the build's own error.
fn open_debug_shell(build_dir: &std::path::Path) {
    let _ = std::io::stderr().flush();
    let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    tracing::info!(shell, dir = %build_dir.display(), "build step failed, opening debug shell");
    match std::process::Command::new(&shell).current_dir(build_dir).status() {
        Ok(_) => {}
        Err(err) => tracing::warn!(%err, "failed to open debug shell"),
    }
}
