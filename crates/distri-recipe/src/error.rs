// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),
    #[error("invalid meta file {path}: {reason}")]
    InvalidMeta { path: String, reason: String },
    #[error("malformed version {0:?}")]
    MalformedVersion(String),
    #[error("malformed package identifier {0:?}")]
    MalformedIdent(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
