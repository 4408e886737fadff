// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("package not found: {0}")]
    NotFound(String),
    #[error("missing meta file for {0}")]
    MissingMeta(String),
    #[error(transparent)]
    InvalidMeta(#[from] distri_recipe::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}
