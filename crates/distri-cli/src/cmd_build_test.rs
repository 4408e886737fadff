// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;

use super::*;

#[derive(Debug, Parser)]
struct TestCli {
    #[command(flatten)]
    build: Build,
}

#[test]
fn test_parses_minimal_invocation() {
    let cli = TestCli::parse_from(["distri", "--pkg", "zlib"]);
    assert_eq!(cli.build.pkg, "zlib");
    assert!(cli.build.hermetic);
    assert!(cli.build.fuse);
    assert_eq!(cli.build.cross, None);
    assert_eq!(cli.build.jobs, None);
    assert_eq!(cli.build.remote, None);
    assert_eq!(cli.build.debug, None);
}

#[test]
fn test_parses_full_invocation() {
    let cli = TestCli::parse_from([
        "distri",
        "--pkg",
        "zlib-amd64",
        "--hermetic",
        "false",
        "--fuse",
        "false",
        "--cross",
        "arm64",
        "--jobs",
        "4",
        "--remote",
        "build01:9000",
        "--debug",
        "after-steps",
    ]);
    assert_eq!(cli.build.pkg, "zlib-amd64");
    assert!(!cli.build.hermetic);
    assert!(!cli.build.fuse);
    assert_eq!(cli.build.cross.as_deref(), Some("arm64"));
    assert_eq!(cli.build.jobs, Some(4));
    assert_eq!(cli.build.remote.as_deref(), Some("build01:9000"));
    assert_eq!(cli.build.debug.as_deref(), Some("after-steps"));
}
