// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Concrete, non-test implementations of the trait boundaries `distri-build`
//! defines for the steps it cannot itself exercise: running a build step as a
//! real subprocess, and writing a built tree into a content-addressed image.

mod image_writer;
mod process_runner;

pub use image_writer::SquashfsImageWriter;
pub use process_runner::CommandRunner;
