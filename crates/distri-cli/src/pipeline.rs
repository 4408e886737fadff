// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Stitches `distri-build`'s pure steps and this crate's concrete
//! `ProcessRunner`/`ImageWriter`/`Downloader` together into one full
//! package build, the same orchestration job `driver.rs` leaves to its
//! caller so it can stay unit-testable without a real subprocess.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use distri_build::{BuildContext, BuildStep, Driver, HttpDownloader, ProcessRunner};
use distri_recipe::PackageIdent;
use distri_resolver::Repo;

use crate::discover::DiscoveredRecipe;
use crate::error::Result;
use crate::support::{CommandRunner, SquashfsImageWriter};

#[cfg(test)]
#[path = "./pipeline_test.rs"]
mod pipeline_test;

/// Options that come from the command line rather than the recipe itself.
pub struct BuildOptions {
    pub arch: String,
    pub hermetic: bool,
    pub fuse: bool,
    pub cross: Option<String>,
    pub jobs: u32,
    pub native_arch: String,
    pub bind_mount_allowlist: Vec<String>,
    /// `<repo_root>/pkg`: where every package publishes its images and meta
    /// files, and where `repo` (the resolver's view) reads them back from.
    pub pkg_root: PathBuf,
}

fn build_context(found: &DiscoveredRecipe, recipe_text: &str, opts: &BuildOptions) -> BuildContext {
    BuildContext {
        recipe: found.recipe.clone(),
        pkg_dir: found.pkg_dir.clone(),
        pkg: found.pkg.clone(),
        arch: opts.arch.clone(),
        version: found.recipe.version.clone(),
        source_dir: found.pkg_dir.join("src"),
        build_dir: found.pkg_dir.join("build"),
        dest_dir: found.pkg_dir.join("dest"),
        prefix: "/usr".to_string(),
        chroot_dir: None,
        hermetic: opts.hermetic,
        fuse: opts.fuse,
        substitute_cache: std::collections::HashMap::new(),
        input_digest: distri_recipe::input_digest(recipe_text, &found.recipe.hash, &[]),
    }
}

/// Find the resolved dependency that provides the C library, so `plan_sandbox`
/// and `compute_ldflags` can point `--dynamic-linker`/`/lib64` at it. `None`
/// when `ctx` itself is that package, since a self-rpath would be circular.
fn libc_full_name(ctx: &BuildContext, ordered_deps: &[String]) -> Option<String> {
    if ctx.pkg == "glibc" || ctx.pkg == "musl" {
        return None;
    }
    ordered_deps
        .iter()
        .find(|full_name| PackageIdent::parse(full_name).map(|id| id.pkg == "glibc" || id.pkg == "musl").unwrap_or(false))
        .cloned()
}

/// Run one package's build to completion: source materialization, dependency
/// resolution, sandbox entry, the builder's own steps, and packaging.
/// Returns the paths of every image written.
pub fn run(found: &DiscoveredRecipe, repo: &dyn Repo, opts: &BuildOptions) -> Result<Vec<PathBuf>> {
    let recipe_text = std::fs::read_to_string(&found.recipe_path)?;
    let mut ctx = build_context(found, &recipe_text, opts);
    std::fs::create_dir_all(&ctx.source_dir)?;
    std::fs::create_dir_all(&ctx.build_dir)?;
    std::fs::create_dir_all(&ctx.dest_dir)?;

    let log_path = ctx.build_dir.join("build.log");
    let runner = CommandRunner::new(&log_path);
    let images = SquashfsImageWriter::new(&opts.pkg_root);
    let downloader = HttpDownloader::default();
    let driver = Driver {
        runner: &runner,
        images: &images,
        downloader: &downloader,
        target_triplet: target_triplet(&opts.arch),
        jobs: opts.jobs,
    };

    tracing::info!(pkg = %ctx.pkg, full_name = %ctx.full_name(), "preparing source");
    distri_build::prepare_source(&driver, &ctx)?;

    tracing::info!(pkg = %ctx.pkg, "resolving dependencies");
    let ordered_deps = distri_build::order_deps_for_path_vars(&distri_build::resolve_dependencies(
        repo,
        &ctx,
        opts.cross.as_deref(),
        &opts.native_arch,
    )?);
    let libc_full_name = libc_full_name(&ctx, &ordered_deps);

    if ctx.hermetic {
        let plan = distri_build::plan_sandbox(&ctx, libc_full_name.as_deref().unwrap_or(&ctx.full_name()), &opts.bind_mount_allowlist);
        enter_sandbox(&mut ctx, &plan)?;
    }

    tracing::info!(pkg = %ctx.pkg, steps = ordered_deps.len(), "running build steps");
    distri_build::run_build_steps(&driver, &ctx, &ordered_deps, libc_full_name.as_deref())?;

    let (runtime_deps, needed_libs) = postprocess_tree(&ctx, &ordered_deps);
    split_debug_info(&driver, &ctx)?;

    let computed_env = distri_build::compute_env(&ctx, &ordered_deps, libc_full_name.as_deref(), opts.jobs);
    generate_wrappers(&driver, &ctx, &computed_env)?;
    curate_lib_dir(&ctx, &needed_libs, &ordered_deps)?;

    let runtime_unions = found.recipe.runtime_union.iter().map(|u| u.name.clone()).collect();

    tracing::info!(pkg = %ctx.pkg, "packaging output");
    Ok(distri_build::package(&driver, &ctx, repo, &opts.pkg_root, runtime_deps, runtime_unions)?)
}

fn target_triplet(arch: &str) -> String {
    match arch {
        "amd64" => "x86_64-linux-gnu",
        "arm64" => "aarch64-linux-gnu",
        "i386" => "i686-linux-gnu",
        "riscv64" => "riscv64-linux-gnu",
        other => other,
    }
    .to_string()
}

/// Enter the hermetic sandbox for the remainder of this process's lifetime.
/// Run only from `distri build`, never from a `distri batch` worker
/// thread: `chroot`/`unshare` are process-wide, so batch delegates each
/// package to its own `distri build` subprocess instead of sandboxing a
/// thread (see `cmd_batch`).
fn enter_sandbox(ctx: &mut BuildContext, plan: &distri_sandbox::SandboxPlan) -> Result<()> {
    distri_sandbox::check_can_sandbox()?;
    let root = distri_sandbox::create_temp_root(&ctx.full_name())?;
    distri_sandbox::enter_user_and_mount_namespace()?;
    distri_sandbox::enter_hermetic_sandbox(root.path(), plan, &ctx.build_dir)?;
    ctx.chroot_dir = Some(root.into_path());
    Ok(())
}

/// Scan the built output tree for ELF dependencies, interpreter lines, and
/// pkg-config `Requires:` to assemble the runtime-dependency set a built
/// image's meta file records. Unresolved references are logged, not
/// treated as build failures — the tree may legitimately use host tools
/// the dependency closure doesn't own. Returns both the resolved owning
/// packages and the raw needed-library file names, the latter for
/// [`curate_lib_dir`].
fn postprocess_tree(ctx: &BuildContext, ordered_deps: &[String]) -> (Vec<String>, BTreeSet<String>) {
    let lib_owners = lib_owners(ctx, ordered_deps);
    let mut runtime_deps: BTreeSet<String> = BTreeSet::new();
    let mut needed_libs: BTreeSet<String> = BTreeSet::new();

    let out_dir = ctx.dest_dir.join("out");
    for entry in walkdir::WalkDir::new(&out_dir).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path();
        let Ok(bytes) = std::fs::read(path) else { continue };

        if let Some(needed) = distri_build::elf_deps::needed_libraries(&bytes) {
            let (resolved, unresolved) = distri_build::elf_deps::resolve_owners(&needed, &lib_owners);
            runtime_deps.extend(resolved);
            needed_libs.extend(needed.iter().cloned());
            for lib in unresolved {
                tracing::warn!(pkg = %ctx.pkg, path = %path.display(), lib, "unresolved ELF dependency");
            }
            continue;
        }

        if let Ok(text) = std::str::from_utf8(&bytes) {
            if let Some(first_line) = text.lines().next() {
                if let Some(owner) = distri_build::interpreter::parse_shebang_package(first_line) {
                    runtime_deps.insert(owner);
                }
            }
            if path.extension().and_then(|e| e.to_str()) == Some("pc") {
                for module in distri_build::pkgconfig::parse_requires(text) {
                    if let Some(owner) = ordered_deps.iter().find(|full_name| full_name.starts_with(&format!("{module}-"))) {
                        runtime_deps.insert(owner.clone());
                    }
                }
            }
        }
    }

    (runtime_deps.into_iter().collect(), needed_libs)
}

/// Generate a compiled wrapper in a top-level `bin/` for every executable
/// under `out/bin`/`out/sbin`: a small Go program that sets `extra_env`
/// (appending to whatever it inherits) and `exec`s the real binary at its
/// final sandbox path, `/ro/<fullname>/<subdir>/<name>`.
fn generate_wrappers(driver: &Driver, ctx: &BuildContext, extra_env: &BTreeMap<String, String>) -> Result<()> {
    let bin_dir = ctx.dest_dir.join("bin");
    std::fs::create_dir_all(&bin_dir)?;

    for subdir in ["out/bin", "out/sbin"] {
        let dir = ctx.dest_dir.join(subdir);
        let Ok(entries) = std::fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            let target = format!("/ro/{}/{subdir}/{}", ctx.full_name(), name.to_string_lossy());
            let source = distri_build::wrapper::generate_wrapper_source(&target, extra_env);
            let source_path = ctx.build_dir.join(format!("wrapper-{}.go", name.to_string_lossy()));
            std::fs::write(&source_path, source)?;

            let wrapper_path = bin_dir.join(&name);
            driver.runner.run(&BuildStep {
                argv: vec!["go".into(), "build".into(), "-o".into(), wrapper_path.display().to_string(), source_path.display().to_string()],
                cwd: ctx.build_dir.clone(),
                extra_env: Default::default(),
            })?;
        }
    }
    Ok(())
}

/// Replace the dependency-closure `lib/` view with a directory of symlinks
/// to only the libraries this package's own ELF files actually need, each
/// resolved past any intermediate symlink to the file that owns it.
fn curate_lib_dir(ctx: &BuildContext, needed_libs: &BTreeSet<String>, ordered_deps: &[String]) -> Result<()> {
    let mut lib_real_paths = BTreeMap::new();
    if let Some(repo_root) = ctx.pkg_dir.ancestors().nth(2) {
        for full_name in ordered_deps {
            let lib_dir = repo_root.join("pkg").join(full_name).join("out/lib");
            let Ok(entries) = std::fs::read_dir(&lib_dir) else { continue };
            for entry in entries.flatten() {
                let real_path = std::fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path());
                lib_real_paths.insert(entry.file_name().to_string_lossy().into_owned(), real_path);
            }
        }
    }

    let curated = distri_build::libdir::curate(needed_libs, &lib_real_paths);
    let lib_dir = ctx.dest_dir.join("lib");
    let _ = std::fs::remove_dir_all(&lib_dir);
    std::fs::create_dir_all(&lib_dir)?;
    #[cfg(unix)]
    for (name, real_path) in &curated {
        std::os::unix::fs::symlink(real_path, lib_dir.join(name))?;
    }
    Ok(())
}

/// Extract a `.note.gnu.build-id` section's raw bytes from an ELF file, by
/// name rather than `goblin`'s typed note iterator, matching the hand-rolled
/// note parsing in `distri_build::debug_split`.
fn build_id_note(bytes: &[u8]) -> Option<Vec<u8>> {
    let elf = goblin::elf::Elf::parse(bytes).ok()?;
    elf.section_headers.iter().find_map(|sh| {
        if elf.shdr_strtab.get_at(sh.sh_name)? != ".note.gnu.build-id" {
            return None;
        }
        let start = sh.sh_offset as usize;
        let end = start.checked_add(sh.sh_size as usize)?;
        bytes.get(start..end).map(<[u8]>::to_vec)
    })
}

/// Split debug symbols out of every stripped-eligible ELF file under
/// `out/`, keyed by its GNU build-ID. Skipped entirely for `binutils`,
/// which must stay debuggable to build itself.
fn split_debug_info(driver: &Driver, ctx: &BuildContext) -> Result<()> {
    if distri_build::debug_split::should_keep_debug_symbols(&ctx.pkg) {
        return Ok(());
    }

    let out_dir = ctx.dest_dir.join("out");
    for entry in walkdir::WalkDir::new(&out_dir).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path().to_path_buf();
        let Ok(bytes) = std::fs::read(&path) else { continue };
        let Some(note) = build_id_note(&bytes) else { continue };
        let Some(build_id) = distri_build::debug_split::parse_build_id_note(&note) else { continue };

        let debug_path = ctx.dest_dir.join("debug/.build-id").join(&build_id[..2]).join(format!("{}.debug", &build_id[2..]));
        if let Some(parent) = debug_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        driver.runner.run(&BuildStep {
            argv: vec!["objcopy".into(), "--only-keep-debug".into(), path.display().to_string(), debug_path.display().to_string()],
            cwd: ctx.build_dir.clone(),
            extra_env: Default::default(),
        })?;
        driver.runner.run(&BuildStep {
            argv: vec![
                "objcopy".into(),
                "--strip-debug".into(),
                format!("--add-gnu-debuglink={}", debug_path.display()),
                path.display().to_string(),
            ],
            cwd: ctx.build_dir.clone(),
            extra_env: Default::default(),
        })?;
    }
    Ok(())
}

/// `library file name -> owning full name`, built by listing `out/lib` for
/// each already-resolved dependency.
fn lib_owners(ctx: &BuildContext, ordered_deps: &[String]) -> std::collections::BTreeMap<String, String> {
    let mut owners = std::collections::BTreeMap::new();
    let Ok(repo_root) = ctx.pkg_dir.ancestors().nth(2).map(Path::to_path_buf).ok_or(()) else {
        return owners;
    };
    for full_name in ordered_deps {
        let lib_dir = repo_root.join("pkg").join(full_name).join("out/lib");
        let Ok(entries) = std::fs::read_dir(&lib_dir) else { continue };
        for entry in entries.flatten() {
            owners.insert(entry.file_name().to_string_lossy().into_owned(), full_name.clone());
        }
    }
    owners
}
