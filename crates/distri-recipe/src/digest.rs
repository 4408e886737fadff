// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Input digest computation (Glossary: "Input digest").

use data_encoding::HEXLOWER;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 over a recipe's raw text, its source hash, and the
/// fully-qualified names of its resolved dependencies, in that order. Used to
/// decide whether a previously built image can be reused without rebuilding.
pub fn input_digest(recipe_text: &str, source_hash: &str, resolved_deps: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(recipe_text.as_bytes());
    hasher.update(b"\0");
    hasher.update(source_hash.as_bytes());
    for dep in resolved_deps {
        hasher.update(b"\0");
        hasher.update(dep.as_bytes());
    }
    HEXLOWER.encode(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable_for_same_inputs() {
        let a = input_digest("recipe text", "abc123", &["gcc-amd64-8.2.0-3".into()]);
        let b = input_digest("recipe text", "abc123", &["gcc-amd64-8.2.0-3".into()]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_changes_with_dep_order() {
        let a = input_digest("r", "h", &["a".into(), "b".into()]);
        let b = input_digest("r", "h", &["b".into(), "a".into()]);
        assert_ne!(a, b, "dep order is part of the resolved closure and must affect the digest");
    }

    #[test]
    fn test_digest_changes_with_recipe_text() {
        let a = input_digest("recipe v1", "abc", &[]);
        let b = input_digest("recipe v2", "abc", &[]);
        assert_ne!(a, b);
    }
}
