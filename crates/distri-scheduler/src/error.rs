// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("dependency cycle among {0:?} could not be broken")]
    UnbreakableCycle(Vec<String>),
    #[error("batch run cancelled")]
    Cancelled,
}
