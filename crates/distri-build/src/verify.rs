// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Artifact hash verification.

use data_encoding::HEXLOWER;
use sha2::{Digest, Sha256};

use crate::error::Error;

#[cfg(test)]
#[path = "./verify_test.rs"]
mod verify_test;

/// Compute the hex-encoded SHA-256 of `bytes` and compare it against
/// `expected`. `HashMismatch` is fatal and must not be cached — the caller
/// should remove whatever was downloaded rather than reuse it.
pub fn verify_hash(bytes: &[u8], expected: &str) -> Result<(), Error> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let actual = HEXLOWER.encode(&hasher.finalize());
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(Error::HashMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}
