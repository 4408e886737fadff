// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::path::PathBuf;

use distri_recipe::{Recipe, Version};

use super::*;

fn ctx(pkg: &str) -> BuildContext {
    BuildContext {
        recipe: Recipe {
            pkg: pkg.into(),
            source: distri_recipe::Source::Empty,
            hash: String::new(),
            version: Version { upstream: "1.0".into(), distri_revision: 1 },
            builder: distri_recipe::Builder::C(distri_recipe::CConfig::default()),
            dep: vec![],
            runtime_dep: vec![],
            cherry_pick: vec![],
            extra_file: vec![],
            install: vec![],
            split_package: vec![],
            runtime_union: vec![],
        },
        pkg_dir: PathBuf::from(format!("/pkgs/{pkg}")),
        pkg: pkg.into(),
        arch: "amd64".into(),
        version: Version { upstream: "1.0".into(), distri_revision: 1 },
        source_dir: PathBuf::from("/build/src"),
        build_dir: PathBuf::from("/build/build"),
        dest_dir: PathBuf::from("/build/dest"),
        prefix: "/usr".into(),
        chroot_dir: None,
        hermetic: true,
        fuse: false,
        substitute_cache: HashMap::new(),
        input_digest: "deadbeef".into(),
    }
}

#[test]
fn test_target_triplet_known_arches() {
    assert_eq!(target_triplet("amd64"), "x86_64-linux-gnu");
    assert_eq!(target_triplet("arm64"), "aarch64-linux-gnu");
    assert_eq!(target_triplet("i386"), "i686-linux-gnu");
    assert_eq!(target_triplet("riscv64"), "riscv64-linux-gnu");
}

#[test]
fn test_target_triplet_passes_through_unknown_arch() {
    assert_eq!(target_triplet("mips64"), "mips64");
}

#[test]
fn test_libc_full_name_finds_glibc_dependency() {
    let ctx = ctx("zlib");
    let deps = vec!["bash-amd64-5.2-1".to_string(), "glibc-amd64-2.38-1".to_string()];
    assert_eq!(libc_full_name(&ctx, &deps), Some("glibc-amd64-2.38-1".to_string()));
}

#[test]
fn test_libc_full_name_none_for_musl_self() {
    let ctx = ctx("musl");
    let deps = vec!["bash-amd64-5.2-1".to_string()];
    assert_eq!(libc_full_name(&ctx, &deps), None);
}

#[test]
fn test_libc_full_name_none_when_absent() {
    let ctx = ctx("zlib");
    let deps = vec!["bash-amd64-5.2-1".to_string(), "coreutils-amd64-9.1-1".to_string()];
    assert_eq!(libc_full_name(&ctx, &deps), None);
}

#[test]
fn test_build_id_note_none_for_garbage_bytes() {
    assert_eq!(build_id_note(b"not an elf file"), None);
}
