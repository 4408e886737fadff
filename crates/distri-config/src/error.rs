// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Cannot load config, lock has been poisoned: {0}")]
    LockPoisonedRead(String),
    #[error("Cannot update config, lock has been poisoned: {0}")]
    LockPoisonedWrite(String),
    #[error("Repo root could not be determined; set DISTRI_ROOT or repo.root in the config file")]
    NoRepoRoot,
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
