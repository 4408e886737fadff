// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Debug-info splitting, keyed by the GNU build-ID note.
//! Reads the ELF note section by hand rather than through
//! `goblin`'s higher-level note iterator, since the only thing needed here
//! is the raw build-id bytes.

use std::path::PathBuf;

#[cfg(test)]
#[path = "./debug_split_test.rs"]
mod debug_split_test;

/// A package that must stay debuggable in order to build itself: `objcopy`
/// and friends come from `binutils`, so stripping its own binaries would
/// make later builds unable to debug-split anything.
const KEEP_DEBUG_SYMBOLS: &[&str] = &["binutils"];

pub fn should_keep_debug_symbols(pkg: &str) -> bool {
    KEEP_DEBUG_SYMBOLS.contains(&pkg)
}

/// Parse a `.note.gnu.build-id` section's raw bytes (the standard
/// `Elf{32,64}_Nhdr` layout: `namesz`, `descsz`, `type`, then the
/// 4-byte-aligned name and description) into a lowercase hex string.
pub fn parse_build_id_note(note: &[u8]) -> Option<String> {
    if note.len() < 12 {
        return None;
    }
    let namesz = u32::from_le_bytes(note[0..4].try_into().ok()?) as usize;
    let descsz = u32::from_le_bytes(note[4..8].try_into().ok()?) as usize;
    let name_aligned = namesz.div_ceil(4) * 4;
    let desc_start = 12 + name_aligned;
    let desc_end = desc_start + descsz;
    if desc_end > note.len() {
        return None;
    }
    Some(note[desc_start..desc_end].iter().map(|b| format!("{b:02x}")).collect())
}

/// The `.debug` path for a build-id, e.g. `aa/bbbbbbbb....debug`.
pub fn debug_path_for_build_id(build_id: &str) -> Option<PathBuf> {
    if build_id.len() < 3 {
        return None;
    }
    let (prefix, rest) = build_id.split_at(2);
    Some(PathBuf::from(prefix).join(format!("{rest}.debug")))
}
