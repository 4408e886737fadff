// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_matching_hash_is_accepted() {
    let digest = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde";
    verify_hash(b"hello world", digest).unwrap();
}

#[test]
fn test_mismatched_hash_is_fatal() {
    let err = verify_hash(b"hello world", "0".repeat(64).as_str()).unwrap_err();
    assert!(matches!(err, Error::HashMismatch { .. }));
}

#[test]
fn test_hash_comparison_is_case_insensitive() {
    let digest = "B94D27B9934D3E08A52E52D7DA7DABFAC484EFE37A5380EE9088F7ACE2EFCDE";
    verify_hash(b"hello world", digest).unwrap();
}
