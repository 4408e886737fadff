// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_defaults_are_sane() {
    let config = Config::default();
    assert_eq!(config.repo.arch, "amd64");
    assert!(config.build.hermetic);
    assert!(config.build.fuse);
    assert!(config.build.jobs >= 1);
}

#[test]
fn test_repo_root_requires_explicit_value() {
    let config = Config::default();
    assert!(matches!(config.repo_root(), Err(crate::Error::NoRepoRoot)));

    let mut config = config;
    config.repo.root = "/srv/distri".into();
    assert_eq!(config.repo_root().unwrap(), PathBuf::from("/srv/distri"));
}

#[test]
fn test_env_override_beats_compiled_default() {
    // SAFETY: test runs single-threaded with respect to this var; no other
    // test in this crate reads or writes DISTRI_BUILD_JOBS.
    unsafe {
        std::env::set_var("DISTRI_BUILD_JOBS", "17");
    }
    let config = load_config().expect("load_config");
    unsafe {
        std::env::remove_var("DISTRI_BUILD_JOBS");
    }
    assert_eq!(config.build.jobs, 17);
}

#[test]
fn test_malformed_section_without_underscore_is_ignored() {
    // DISTRI_LOG has no `<section>_<name>` split and must not be treated as
    // a config override (mirrors spk's handling of bare SPK_LOG).
    unsafe {
        std::env::set_var("DISTRI_LOG", "debug");
    }
    let result = load_config();
    unsafe {
        std::env::remove_var("DISTRI_LOG");
    }
    assert!(result.is_ok());
}
