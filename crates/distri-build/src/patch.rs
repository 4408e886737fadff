// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Cherry-pick application. Each `cherry_pick` is a unified
//! diff applied in order against the extracted source tree; a failed hunk
//! aborts the build rather than leaving a partially patched tree.

use std::path::Path;

use crate::error::{Error, Result};

#[cfg(test)]
#[path = "./patch_test.rs"]
mod patch_test;

/// Apply one unified diff (possibly touching several files) to `source_dir`.
/// Every `---`/`+++` path in the diff is taken relative to `source_dir`,
/// with a leading `a/` or `b/` component stripped the way `patch -p1` does.
pub fn apply_patch(source_dir: &Path, diff_text: &str) -> Result<()> {
    let patch = diffy::Patch::from_str(diff_text)
        .map_err(|e| Error::PatchFailed(format!("could not parse patch: {e}")))?;

    let target = strip_p1(
        patch
            .modified()
            .or_else(|| patch.original())
            .ok_or_else(|| Error::PatchFailed("patch has no file header to target".into()))?,
    );
    let path = source_dir.join(target);
    let original = std::fs::read_to_string(&path)
        .map_err(|e| Error::PatchFailed(format!("reading {}: {e}", path.display())))?;
    let patched = diffy::apply(&original, &patch)
        .map_err(|e| Error::PatchFailed(format!("applying patch to {}: {e}", path.display())))?;
    std::fs::write(&path, patched)?;
    Ok(())
}

fn strip_p1(path: &str) -> &str {
    path.strip_prefix("a/").or_else(|| path.strip_prefix("b/")).unwrap_or(path)
}
