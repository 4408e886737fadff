// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! The per-build state machine.

#[cfg(test)]
#[path = "./state_test.rs"]
mod state_test;

/// One stage of a single package build. `Verified` and `Extracted` are
/// idempotent: re-entering the driver after a crash re-checks them and skips
/// ahead on a cache hit rather than redoing the work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildState {
    Init,
    Downloaded,
    Verified,
    Extracted,
    Patched,
    DepsResolved,
    Sandboxed,
    Built,
    PostProcessed,
    Packaged,
    Done,
}

impl BuildState {
    /// The state that immediately follows this one on the happy path.
    pub fn next(self) -> Option<BuildState> {
        use BuildState::*;
        Some(match self {
            Init => Downloaded,
            Downloaded => Verified,
            Verified => Extracted,
            Extracted => Patched,
            Patched => DepsResolved,
            DepsResolved => Sandboxed,
            Sandboxed => Built,
            Built => PostProcessed,
            PostProcessed => Packaged,
            Packaged => Done,
            Done => return None,
        })
    }

    /// True for `Verified`/`Extracted`: a build resuming from a crash may
    /// observe these already satisfied and skip straight past them.
    pub fn is_idempotent(self) -> bool {
        matches!(self, BuildState::Verified | BuildState::Extracted)
    }
}
