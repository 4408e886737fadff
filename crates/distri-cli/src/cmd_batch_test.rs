// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;

use super::*;

#[derive(Debug, Parser)]
struct TestCli {
    #[command(flatten)]
    batch: Batch,
}

#[test]
fn test_defaults_to_no_dry_run_no_rebuild() {
    let cli = TestCli::parse_from(["distri"]);
    assert_eq!(cli.batch.jobs, None);
    assert!(!cli.batch.dry_run);
    assert!(!cli.batch.rebuild);
}

#[test]
fn test_parses_jobs_dry_run_and_rebuild() {
    let cli = TestCli::parse_from(["distri", "--jobs", "8", "--dry_run", "--rebuild"]);
    assert_eq!(cli.batch.jobs, Some(8));
    assert!(cli.batch.dry_run);
    assert!(cli.batch.rebuild);
}
