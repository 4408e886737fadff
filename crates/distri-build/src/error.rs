// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::state::BuildState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Recipe(#[from] distri_recipe::Error),
    #[error(transparent)]
    Resolver(#[from] distri_resolver::Error),
    #[error(transparent)]
    Sandbox(#[from] distri_sandbox::Error),
    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
    #[error("build step failed at {stage:?}: {cause}, see log at {log_path}")]
    BuildStepFailed {
        stage: BuildState,
        cause: String,
        log_path: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unsupported archive format: {0}")]
    UnsupportedArchive(String),
    #[error("patch application failed: {0}")]
    PatchFailed(String),
    #[error("source resolution failed: {0}")]
    SourceFailed(String),
    #[error("no split_package claims {path:?} under {full_name}")]
    UnclaimedPath { full_name: String, path: String },
}
