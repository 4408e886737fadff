// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn build_note(name: &[u8], desc: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(name.len() as u32).to_le_bytes());
    out.extend_from_slice(&(desc.len() as u32).to_le_bytes());
    out.extend_from_slice(&3u32.to_le_bytes()); // NT_GNU_BUILD_ID
    out.extend_from_slice(name);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out.extend_from_slice(desc);
    out
}

#[test]
fn test_parse_build_id_note_extracts_hex_digest() {
    let note = build_note(b"GNU\0", &[0xaa, 0xbb, 0xcc, 0xdd]);
    assert_eq!(parse_build_id_note(&note), Some("aabbccdd".to_string()));
}

#[test]
fn test_parse_build_id_note_rejects_truncated_input() {
    assert_eq!(parse_build_id_note(&[0, 0, 0]), None);
}

#[test]
fn test_debug_path_splits_first_two_hex_chars() {
    assert_eq!(debug_path_for_build_id("aabbccdd").unwrap(), PathBuf::from("aa").join("bbccdd.debug"));
}

#[test]
fn test_binutils_keeps_debug_symbols() {
    assert!(should_keep_debug_symbols("binutils"));
    assert!(!should_keep_debug_symbols("zlib"));
}
