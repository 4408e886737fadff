// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use distri_recipe::{Meta, Recipe, Source, Version};
use tempfile::tempdir;

use super::*;

struct FakeDownloader {
    responses: HashMap<String, Vec<u8>>,
}

impl source::Downloader for FakeDownloader {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.responses.get(url).cloned().ok_or_else(|| Error::SourceFailed(format!("no fixture for {url}")))
    }
}

struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, step: &BuildStep) -> Result<()> {
        self.calls.lock().unwrap().push(step.argv.clone());
        Ok(())
    }
}

struct FakeImageWriter;

impl ImageWriter for FakeImageWriter {
    fn write_image(&self, full_name: &str, _dir: &Path) -> Result<PathBuf> {
        Ok(PathBuf::from(format!("{full_name}.squashfs")))
    }
}

struct FakeRepo {
    metas: HashMap<String, Meta>,
}

impl distri_resolver::Repo for FakeRepo {
    fn has_meta(&self, full_name: &str) -> bool {
        self.metas.contains_key(full_name)
    }

    fn list_matches(&self, pkg: &str) -> distri_resolver::Result<Vec<String>> {
        Ok(self.metas.keys().filter(|n| n.starts_with(&format!("{pkg}-"))).cloned().collect())
    }

    fn read_meta(&self, full_name: &str) -> distri_resolver::Result<Meta> {
        self.metas.get(full_name).cloned().ok_or_else(|| distri_resolver::Error::MissingMeta(full_name.to_string()))
    }
}

fn empty_ctx(dest_dir: PathBuf, source_dir: PathBuf, pkg_dir: PathBuf) -> BuildContext {
    BuildContext {
        recipe: Recipe {
            pkg: "hello".into(),
            source: Source::Empty,
            hash: String::new(),
            version: Version { upstream: "1.0".into(), distri_revision: 1 },
            builder: distri_recipe::Builder::Steps(vec![vec!["touch".into(), "${DISTRI_DESTDIR}/out/hello".into()]]),
            dep: vec![],
            runtime_dep: vec![],
            cherry_pick: vec![],
            extra_file: vec![],
            install: vec![],
            split_package: vec![],
            runtime_union: vec![],
        },
        pkg_dir,
        pkg: "hello".into(),
        arch: "amd64".into(),
        version: Version { upstream: "1.0".into(), distri_revision: 1 },
        source_dir,
        build_dir: PathBuf::from("/build/hello/build"),
        dest_dir,
        prefix: "/usr".into(),
        chroot_dir: None,
        hermetic: true,
        fuse: false,
        substitute_cache: HashMap::new(),
        input_digest: "deadbeef".into(),
    }
}

fn fake_driver<'a>(downloader: &'a FakeDownloader, runner: &'a RecordingRunner, images: &'a FakeImageWriter) -> Driver<'a> {
    Driver {
        runner,
        images,
        downloader,
        target_triplet: "x86_64-linux-gnu".into(),
        jobs: 4,
    }
}

#[test]
fn test_prepare_source_materializes_empty_source() {
    let dest = tempdir().unwrap();
    let source_dir = dest.path().join("src");
    let downloader = FakeDownloader { responses: HashMap::new() };
    let runner = RecordingRunner { calls: Mutex::new(vec![]) };
    let images = FakeImageWriter;
    let driver = fake_driver(&downloader, &runner, &images);

    let ctx = empty_ctx(dest.path().join("dest"), source_dir.clone(), dest.path().to_path_buf());
    let state = prepare_source(&driver, &ctx).unwrap();

    assert_eq!(state, BuildState::Patched);
    assert!(source_dir.is_dir());
}

#[test]
fn test_prepare_source_rejects_gomod_without_fetcher() {
    let dest = tempdir().unwrap();
    let downloader = FakeDownloader { responses: HashMap::new() };
    let runner = RecordingRunner { calls: Mutex::new(vec![]) };
    let images = FakeImageWriter;
    let driver = fake_driver(&downloader, &runner, &images);

    let mut ctx = empty_ctx(dest.path().join("dest"), dest.path().join("src"), dest.path().to_path_buf());
    ctx.recipe.source = Source::DistriGomod { import_path: "golang.org/x/net".into(), version: "v0.1.0".into() };

    let err = prepare_source(&driver, &ctx).unwrap_err();
    assert!(matches!(err, Error::SourceFailed(_)));
}

#[test]
fn test_run_build_steps_executes_substituted_steps_builder() {
    let dest = tempdir().unwrap();
    let downloader = FakeDownloader { responses: HashMap::new() };
    let runner = RecordingRunner { calls: Mutex::new(vec![]) };
    let images = FakeImageWriter;
    let driver = fake_driver(&downloader, &runner, &images);

    let ctx = empty_ctx(dest.path().join("dest"), dest.path().join("src"), dest.path().to_path_buf());
    run_build_steps(&driver, &ctx, &[], None).unwrap();

    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0], "touch");
    assert!(calls[0][1].starts_with(&ctx.dest_dir.display().to_string()));
}

#[test]
fn test_resolve_dependencies_globs_and_closes_transitively() {
    let mut metas = HashMap::new();
    metas.insert(
        "zlib-amd64-1.2-1".to_string(),
        Meta {
            runtime_dep: vec![],
            source_pkg: "zlib".into(),
            version: Version { upstream: "1.2".into(), distri_revision: 1 },
            runtime_union: vec![],
            input_digest: "x".into(),
        },
    );
    let repo = FakeRepo { metas };

    let mut ctx = empty_ctx(PathBuf::from("/dest"), PathBuf::from("/src"), PathBuf::from("/pkgs/hello"));
    ctx.recipe.dep = vec!["zlib".into()];

    let resolved = resolve_dependencies(&repo, &ctx, None, "amd64").unwrap();
    assert!(resolved.iter().any(|d| d == "zlib-amd64-1.2-1"));
}

#[test]
fn test_package_writes_meta_before_image_and_symlink() {
    let dest = tempdir().unwrap();
    let pkg_dir = dest.path().join("pkgs/hello");
    std::fs::create_dir_all(&pkg_dir).unwrap();
    let dest_dir = dest.path().join("build/dest");
    std::fs::create_dir_all(dest_dir.join("out/bin")).unwrap();
    std::fs::write(dest_dir.join("out/bin/hello"), b"binary").unwrap();

    let downloader = FakeDownloader { responses: HashMap::new() };
    let runner = RecordingRunner { calls: Mutex::new(vec![]) };
    let images = FakeImageWriter;
    let driver = fake_driver(&downloader, &runner, &images);
    let repo = FakeRepo { metas: HashMap::new() };

    let mut ctx = empty_ctx(dest_dir, PathBuf::from("/src"), pkg_dir.clone());
    ctx.build_dir = dest.path().join("build");
    let written = package(&driver, &ctx, &repo, &pkg_dir, vec![], vec![]).unwrap();

    assert_eq!(written, vec![PathBuf::from("hello-amd64-1.0-1.squashfs")]);
    assert!(pkg_dir.join("hello-amd64-1.0-1.meta.textproto").is_file());
    assert!(pkg_dir.join("hello-amd64.meta.textproto").exists());
}

#[test]
fn test_package_materializes_split_with_distinct_content_and_sibling_dep() {
    let dest = tempdir().unwrap();
    let pkg_dir = dest.path().join("pkgs/hello");
    std::fs::create_dir_all(&pkg_dir).unwrap();
    let build_dir = dest.path().join("build/hello");
    let dest_dir = build_dir.join("dest");
    std::fs::create_dir_all(dest_dir.join("out/bin")).unwrap();
    std::fs::create_dir_all(dest_dir.join("out/lib")).unwrap();
    std::fs::write(dest_dir.join("out/bin/hello"), b"binary").unwrap();
    std::fs::write(dest_dir.join("out/lib/libhello.so"), b"lib").unwrap();

    let downloader = FakeDownloader { responses: HashMap::new() };
    let runner = RecordingRunner { calls: Mutex::new(vec![]) };
    let images = FakeImageWriter;
    let driver = fake_driver(&downloader, &runner, &images);
    let repo = FakeRepo { metas: HashMap::new() };

    let mut ctx = empty_ctx(dest_dir.clone(), PathBuf::from("/src"), pkg_dir.clone());
    ctx.build_dir = build_dir;
    ctx.recipe.split_package = vec![distri_recipe::SplitPackage {
        name: "libs".into(),
        claims: vec![distri_recipe::Claim { glob: "out/lib/*".into() }],
    }];

    let written = package(&driver, &ctx, &repo, &pkg_dir, vec![], vec![]).unwrap();
    assert_eq!(written, vec![PathBuf::from("hello-amd64-1.0-1-libs.squashfs"), PathBuf::from("hello-amd64-1.0-1.squashfs")]);

    assert!(!dest_dir.join("out/lib/libhello.so").exists());
    assert!(dest_dir.join("out/bin/hello").exists());

    let main_meta = distri_recipe::Meta::read_from(pkg_dir.join("hello-amd64-1.0-1.meta.textproto")).unwrap();
    assert!(main_meta.runtime_dep.iter().any(|d| d == "hello-amd64-1.0-1-libs"));
}

#[test]
fn test_plan_sandbox_includes_source_mount_and_exchange_symlinks() {
    let ctx = empty_ctx(PathBuf::from("/build/hello/dest"), PathBuf::from("/build/hello/src"), PathBuf::from("/pkgs/hello"));
    let allowlist = vec!["lib".to_string(), "include".to_string()];

    let plan = plan_sandbox(&ctx, "glibc-amd64-2.3-1", &allowlist);

    assert!(plan.bind_mounts.iter().any(|m| m.target == PathBuf::from("/usr/src/hello-amd64-1.0-1")));
    assert!(plan.symlinks.iter().any(|s| s.link == PathBuf::from("/lib")));
    assert!(plan.symlinks.iter().any(|s| s.link == PathBuf::from("/include")));
}
