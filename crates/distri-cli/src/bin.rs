// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use clap::{Parser, Subcommand};
use distri_cli::{cmd_batch, cmd_build, logging};

/// Hermetic package build engine.
#[derive(Debug, Parser)]
#[command(name = "distri", about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build exactly one package.
    Build(cmd_build::Build),
    /// Build every stale recipe in dependency order.
    Batch(cmd_batch::Batch),
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Build(args) => cmd_build::run(args),
        Command::Batch(args) => cmd_batch::run(args),
    };

    if let Err(err) = result {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
