// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use rstest::rstest;

use super::*;

#[rstest]
#[case("8.2.0-3", "8.2.0", 3)]
#[case("1-1", "1", 1)]
#[case("2019.06.19-0", "2019.06.19", 0)]
fn test_parse_version(#[case] input: &str, #[case] upstream: &str, #[case] revision: i64) {
    let v: Version = input.parse().unwrap();
    assert_eq!(v.upstream, upstream);
    assert_eq!(v.distri_revision, revision);
    assert_eq!(v.to_string(), input);
}

#[rstest]
#[case("no-revision-here")]
#[case("")]
#[case("-3")]
fn test_parse_version_rejects_malformed(#[case] input: &str) {
    assert!(input.parse::<Version>().is_err());
}

#[test]
fn test_ordering_prefers_higher_revision_within_same_upstream() {
    let older: Version = "1-1".parse().unwrap();
    let newer: Version = "1-2".parse().unwrap();
    assert!(newer > older);
}

proptest! {
    #[test]
    fn test_round_trip(upstream in "[a-zA-Z0-9.]{1,20}", revision in 0i64..10_000) {
        let s = format!("{upstream}-{revision}");
        let v: Version = s.parse().unwrap();
        prop_assert_eq!(v.to_string(), s);
    }
}
