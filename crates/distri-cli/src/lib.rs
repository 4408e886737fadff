// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! `distri build` / `distri batch`: the command-line entry point for the
//! build engine. No business logic lives here beyond arg parsing, config
//! loading, and stitching the core crates into a runnable build.

pub mod cmd_batch;
pub mod cmd_build;
pub mod discover;
pub mod error;
pub mod logging;
pub mod pipeline;
mod support;

pub use error::{Error, Result};
