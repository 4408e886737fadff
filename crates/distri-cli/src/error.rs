// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] distri_config::Error),
    #[error(transparent)]
    Recipe(#[from] distri_recipe::Error),
    #[error(transparent)]
    Resolver(#[from] distri_resolver::Error),
    #[error(transparent)]
    Build(#[from] distri_build::Error),
    #[error(transparent)]
    Sandbox(#[from] distri_sandbox::Error),
    #[error(transparent)]
    Scheduler(#[from] distri_scheduler::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("no recipe directory found for {0:?} under the repo's build tree")]
    UnknownPackage(String),
    #[error("{0}")]
    Other(String),
}
