// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn sample() -> Meta {
    Meta {
        runtime_dep: vec!["zlib-amd64-1.2-1".into(), "glibc-amd64-2.31-1".into()],
        source_pkg: "gcc".into(),
        version: Version::new("8.2.0", 3),
        runtime_union: vec!["terminfo-amd64-6.1-1".into()],
        input_digest: "deadbeef".into(),
    }
}

#[test]
fn test_round_trip_through_text() {
    let meta = sample();
    let text = meta.to_text();
    let parsed = Meta::from_text("test.meta.textproto", &text).unwrap();
    assert_eq!(parsed, meta);
}

#[test]
fn test_missing_required_field_is_invalid_meta() {
    let err = Meta::from_text("test.meta.textproto", "source_pkg: \"gcc\"\n").unwrap_err();
    assert!(matches!(err, Error::InvalidMeta { .. }));
}

#[test]
fn test_unknown_field_is_invalid_meta() {
    let text = "source_pkg: \"gcc\"\nversion: \"1-1\"\ninput_digest: \"ab\"\nbogus: \"x\"\n";
    let err = Meta::from_text("test.meta.textproto", text).unwrap_err();
    assert!(matches!(err, Error::InvalidMeta { .. }));
}

#[test]
fn test_write_atomic_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gcc-amd64-8.2.0-3.meta.textproto");
    let meta = sample();
    meta.write_atomic(&path).unwrap();
    let read_back = Meta::read_from(&path).unwrap();
    assert_eq!(read_back, meta);
}

#[test]
fn test_write_atomic_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foo.meta.textproto");
    sample().write_atomic(&path).unwrap();
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("foo.meta.textproto")]);
}
