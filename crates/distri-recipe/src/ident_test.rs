// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[test]
fn test_parse_fully_qualified() {
    let id = PackageIdent::parse("gcc-amd64-8.2.0-3").unwrap();
    assert_eq!(id.pkg, "gcc");
    assert_eq!(id.arch.as_deref(), Some("amd64"));
    assert_eq!(id.upstream.as_deref(), Some("8.2.0"));
    assert_eq!(id.distri_revision, Some(3));
    assert!(id.is_fully_qualified());
    assert_eq!(id.to_string(), "gcc-amd64-8.2.0-3");
}

#[test]
fn test_parse_short_name_no_arch_no_revision() {
    let id = PackageIdent::parse("gcc").unwrap();
    assert_eq!(id.pkg, "gcc");
    assert_eq!(id.arch, None);
    assert_eq!(id.upstream, None);
    assert_eq!(id.distri_revision, None);
    assert!(!id.is_fully_qualified());
}

#[test]
fn test_parse_preserves_hyphenated_package_name() {
    let id = PackageIdent::parse("glibc-dev-amd64-2.31-1").unwrap();
    assert_eq!(id.pkg, "glibc-dev");
    assert_eq!(id.arch.as_deref(), Some("amd64"));
    assert_eq!(id.upstream.as_deref(), Some("2.31"));
    assert_eq!(id.distri_revision, Some(1));
}

#[rstest]
#[case("")]
fn test_parse_rejects_empty(#[case] input: &str) {
    assert!(PackageIdent::parse(input).is_err());
}

#[test]
fn test_ordering_lexical_then_numeric_revision() {
    let a = PackageIdent::parse("foo-amd64-1-1").unwrap();
    let b = PackageIdent::parse("foo-amd64-1-2").unwrap();
    let c = PackageIdent::parse("zzz-amd64-1-1").unwrap();
    assert!(b > a);
    assert!(c > b);
}

#[test]
fn test_fully_qualified_constructor_round_trips_through_display() {
    let version: Version = "1.2.3-4".parse().unwrap();
    let id = PackageIdent::fully_qualified("zlib", "amd64", version);
    assert_eq!(id.to_string(), "zlib-amd64-1.2.3-4");
    let reparsed = PackageIdent::parse(&id.to_string()).unwrap();
    assert_eq!(reparsed, id);
}
