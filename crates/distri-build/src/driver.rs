// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Orchestration of one build through the state machine in [`crate::state`].
//! The pure/testable steps (parsing, env computation, argv
//! generation, claim partitioning) are called directly; the steps that
//! actually touch a subprocess, a sandbox, or an image store go through
//! trait boundaries so this module itself stays unit-testable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use distri_recipe::Meta;

use crate::builder_steps::{self, BuildStep};
use crate::context::BuildContext;
use crate::env;
use crate::error::{Error, Result};
use crate::source;
use crate::state::BuildState;
use crate::verify;

#[cfg(test)]
#[path = "./driver_test.rs"]
mod driver_test;

/// Runs one already-substituted build step, e.g. inside the hermetic
/// sandbox. A real implementation forks, execs, and captures output to the
/// build's log file; untestable without a sandboxed process, so it is
/// injected.
pub trait ProcessRunner {
    fn run(&self, step: &BuildStep) -> Result<()>;
}

/// Serializes a built output directory into a content-addressed image.
/// Untestable without the real image store, so it is injected.
pub trait ImageWriter {
    fn write_image(&self, full_name: &str, dir: &Path) -> Result<PathBuf>;
}

/// Plan this build's sandbox plus its exchange-directory
/// shadow symlinks. Applying the plan (entering namespaces, mounting,
/// chrooting) is `distri-sandbox::exec`'s job, not this crate's; this only
/// computes what that layer needs to apply.
pub fn plan_sandbox(ctx: &BuildContext, libc_full_name: &str, bind_mount_allowlist: &[String]) -> distri_sandbox::SandboxPlan {
    let sandbox_ctx = distri_sandbox::SandboxContext {
        full_name: ctx.full_name(),
        libc_full_name: libc_full_name.to_string(),
        source_dir: ctx.source_dir.clone(),
        dest_dir: ctx.dest_dir.clone(),
        wrappers_dir: {
            let candidate = ctx.pkg_dir.join("wrappers");
            candidate.is_dir().then_some(candidate)
        },
        hermetic: ctx.hermetic,
    };
    let mut plan = distri_sandbox::plan_sandbox(&sandbox_ctx);
    plan.symlinks.extend(distri_sandbox::exchange_dir_symlinks(&sandbox_ctx.full_name, bind_mount_allowlist));
    plan
}

/// The external collaborators a full build needs beyond what this crate
/// computes itself.
pub struct Driver<'a> {
    pub runner: &'a dyn ProcessRunner,
    pub images: &'a dyn ImageWriter,
    pub downloader: &'a dyn source::Downloader,
    pub target_triplet: String,
    pub jobs: u32,
}

/// Run the download → verify → extract → patch portion of a build,
/// advancing `ctx` and returning the state reached. Dependency
/// resolution (`resolve_dependencies`, below), sandboxing, and the builder
/// steps proper are driven separately by the caller.
pub fn prepare_source(driver: &Driver, ctx: &BuildContext) -> Result<BuildState> {
    use distri_recipe::Source;

    match &ctx.recipe.source {
        Source::Http { url } => {
            let bytes = driver.downloader.get(url)?;
            verify::verify_hash(&bytes, &ctx.recipe.hash)?;
            let is_deb = source::cache_file_name(url).ends_with(".deb");
            std::fs::create_dir_all(&ctx.source_dir)?;
            if is_deb {
                source::extract_deb(&bytes, &ctx.source_dir)?;
            } else {
                source::extract_tar_gz(&bytes, &ctx.source_dir)?;
            }
        }
        Source::DistriRoot { path } => {
            crate::fetch::sync_distriroot(Path::new(path), &ctx.source_dir)?;
        }
        Source::Empty => {
            crate::fetch::materialize_empty(&ctx.source_dir)?;
        }
        Source::DistriGomod { .. } | Source::DistriSource { .. } => {
            return Err(Error::SourceFailed(
                "gomod and distri+source origins require a SourceFetcher, not wired into prepare_source".into(),
            ));
        }
    }

    for cherry_pick in &ctx.recipe.cherry_pick {
        let diff_text = match cherry_pick {
            distri_recipe::CherryPick::Local { path } => std::fs::read_to_string(ctx.pkg_dir.join(path))?,
            distri_recipe::CherryPick::Http { url } => {
                String::from_utf8(driver.downloader.get(url)?).map_err(|e| Error::SourceFailed(e.to_string()))?
            }
        };
        crate::patch::apply_patch(&ctx.source_dir, &diff_text)?;
    }

    Ok(BuildState::Patched)
}

/// Resolve the effective build-dep list to concrete full names and compute
/// its transitive runtime closure. `native_arch` is the build
/// host's own architecture, used to decide whether a cross-build also needs
/// the native toolchain.
pub fn resolve_dependencies(
    repo: &dyn distri_resolver::Repo,
    ctx: &BuildContext,
    cross_arch: Option<&str>,
    native_arch: &str,
) -> Result<Vec<String>> {
    let effective = ctx.recipe.effective_build_deps(cross_arch, native_arch);
    let mut globbed = Vec::with_capacity(effective.len());
    for short_name in &effective {
        let full_name = distri_resolver::glob(repo, short_name, &ctx.arch, ctx.hermetic)?
            .ok_or_else(|| distri_resolver::Error::NotFound(short_name.clone()))?;
        globbed.push(full_name);
    }
    Ok(distri_resolver::resolve(repo, &globbed, Some(&ctx.full_name()))?)
}

/// Run the builder's planned steps given the already
/// resolved ordered dependency closure and C-library full name.
pub fn run_build_steps(driver: &Driver, ctx: &BuildContext, ordered_deps: &[String], libc_full_name: Option<&str>) -> Result<()> {
    let computed_env = env::compute_env(ctx, ordered_deps, libc_full_name, driver.jobs);
    let resolved: BTreeMap<String, String> = ordered_deps
        .iter()
        .filter_map(|full_name| {
            distri_recipe::PackageIdent::parse(full_name).ok().map(|id| (id.pkg.clone(), full_name.clone()))
        })
        .collect();

    let steps = builder_steps::plan_build_steps(ctx, &driver.target_triplet, driver.jobs);
    for raw_step in &steps {
        let substituted = builder_steps::substitute_step(raw_step, &computed_env, &resolved);
        driver.runner.run(&substituted).map_err(|e| Error::BuildStepFailed {
            stage: BuildState::Built,
            cause: e.to_string(),
            log_path: ctx.build_dir.join("build.log").display().to_string(),
        })?;
    }
    Ok(())
}

/// Write a meta file into `publish_dir` before handing `content_dir` to the
/// image writer, so a reader never observes an image without its meta.
fn write_meta_and_image(driver: &Driver, publish_dir: &Path, image_full_name: &str, content_dir: &Path, meta: &Meta) -> Result<PathBuf> {
    meta.write_atomic(publish_dir.join(format!("{image_full_name}.meta.textproto")))?;
    driver.images.write_image(image_full_name, content_dir)
}

/// Move every claimed path out of `dest_dir` into `split_dir`, preserving
/// its relative layout, so the split's image and whatever remains for the
/// main image have genuinely distinct content.
fn materialize_split(dest_dir: &Path, split_dir: &Path, paths: &[PathBuf]) -> Result<()> {
    for rel in paths {
        let src = dest_dir.join(rel);
        let dst = split_dir.join(rel);
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(&src, &dst)?;
    }
    Ok(())
}

fn newest_mtime(dir: &Path) -> Result<Option<std::time::SystemTime>> {
    let mut newest = None;
    for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let mtime = entry.metadata()?.modified()?;
        newest = Some(match newest {
            Some(n) if n >= mtime => n,
            _ => mtime,
        });
    }
    Ok(newest)
}

/// Emit a standalone debug image from whatever `split_debug_info` left under
/// `dest_dir/debug`, or nothing if that directory is empty or absent.
fn package_debug_image(driver: &Driver, ctx: &BuildContext, publish_dir: &Path) -> Result<Option<PathBuf>> {
    let debug_dir = ctx.dest_dir.join("debug");
    if std::fs::read_dir(&debug_dir).map(|mut it| it.next().is_none()).unwrap_or(true) {
        return Ok(None);
    }
    let image_full_name = format!("{}-debug", ctx.full_name());
    let meta = Meta {
        runtime_dep: Vec::new(),
        source_pkg: ctx.pkg.clone(),
        version: ctx.version.clone(),
        runtime_union: Vec::new(),
        input_digest: ctx.input_digest.clone(),
    };
    Ok(Some(write_meta_and_image(driver, publish_dir, &image_full_name, &debug_dir, &meta)?))
}

/// Emit the pristine source tree as its own image, skipped when the
/// existing image is already at least as new as every file under
/// `source_dir`.
fn package_src_image(driver: &Driver, ctx: &BuildContext, publish_dir: &Path) -> Result<Option<PathBuf>> {
    if !ctx.source_dir.is_dir() {
        return Ok(None);
    }
    let image_full_name = format!("{}-src", ctx.full_name());
    let image_path = publish_dir.join(format!("{image_full_name}.squashfs"));

    if let Some(newest_source) = newest_mtime(&ctx.source_dir)? {
        if let Ok(existing_mtime) = std::fs::metadata(&image_path).and_then(|m| m.modified()) {
            if existing_mtime >= newest_source {
                return Ok(Some(image_path));
            }
        }
    }

    let meta = Meta {
        runtime_dep: Vec::new(),
        source_pkg: ctx.pkg.clone(),
        version: ctx.version.clone(),
        runtime_union: Vec::new(),
        input_digest: ctx.input_digest.clone(),
    };
    Ok(Some(write_meta_and_image(driver, publish_dir, &image_full_name, &ctx.source_dir, &meta)?))
}

/// Partition the built output tree and hand each split (plus the implicit
/// catch-all) to the image writer, writing its meta file first so a reader
/// never observes an image without one. Splits are materialized and
/// published before the main/catch-all
/// package, whose own meta gains each split's full name as a runtime
/// dependency (so installing the main package pulls its siblings in) and
/// whose `runtime_dep` is the transitive closure `distri_resolver::resolve`
/// computes, not the raw set this build observed directly.
pub fn package(
    driver: &Driver,
    ctx: &BuildContext,
    repo: &dyn distri_resolver::Repo,
    publish_dir: &Path,
    runtime_deps: Vec<String>,
    runtime_unions: Vec<String>,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(publish_dir)?;

    let out_tree_paths = walkdir::WalkDir::new(ctx.dest_dir.join("out"))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(&ctx.dest_dir).ok().map(|p| p.to_path_buf()))
        .collect::<Vec<_>>();

    let splits = crate::package::partition_claims(&ctx.recipe.split_package, &out_tree_paths);

    let mut images = Vec::new();
    let mut main_runtime_deps = runtime_deps.clone();

    for (split_name, paths) in &splits {
        if split_name == crate::package::CATCH_ALL {
            continue;
        }
        let image_full_name = crate::package::image_name(&ctx.full_name(), split_name);
        let split_dir = ctx.build_dir.join("split").join(split_name);
        materialize_split(&ctx.dest_dir, &split_dir, paths)?;

        let closure = distri_resolver::resolve(repo, &runtime_deps, Some(&ctx.full_name()))?;
        let meta = Meta {
            runtime_dep: closure,
            source_pkg: ctx.pkg.clone(),
            version: ctx.version.clone(),
            runtime_union: runtime_unions.clone(),
            input_digest: ctx.input_digest.clone(),
        };
        images.push(write_meta_and_image(driver, publish_dir, &image_full_name, &split_dir, &meta)?);
        main_runtime_deps.push(image_full_name);
    }

    let main_image_full_name = ctx.full_name();
    let main_closure = distri_resolver::resolve(repo, &main_runtime_deps, Some(&ctx.full_name()))?;
    let main_meta = Meta {
        runtime_dep: main_closure,
        source_pkg: ctx.pkg.clone(),
        version: ctx.version.clone(),
        runtime_union: runtime_unions.clone(),
        input_digest: ctx.input_digest.clone(),
    };
    images.push(write_meta_and_image(driver, publish_dir, &main_image_full_name, &ctx.dest_dir, &main_meta)?);

    if let Some(debug_image) = package_debug_image(driver, ctx, publish_dir)? {
        images.push(debug_image);
    }
    if let Some(src_image) = package_src_image(driver, ctx, publish_dir)? {
        images.push(src_image);
    }

    let symlink_path = publish_dir.join(format!("{}-{}.meta.textproto", ctx.pkg, ctx.arch));
    let _ = std::fs::remove_file(&symlink_path);
    #[cfg(unix)]
    std::os::unix::fs::symlink(format!("{}.meta.textproto", ctx.full_name()), &symlink_path)?;

    Ok(images)
}
