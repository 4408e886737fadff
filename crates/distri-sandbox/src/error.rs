// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Nix(#[from] nix::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("missing required capability to enter a namespace: {0}")]
    MissingCapability(&'static str),
    #[error("FUSE control operation failed: {0}")]
    FuseControl(String),
    #[error("remote builder operation failed: {0}")]
    RemoteBuilder(String),
}
