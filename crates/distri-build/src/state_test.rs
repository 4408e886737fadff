// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_happy_path_reaches_done() {
    let mut state = BuildState::Init;
    let mut steps = 0;
    while let Some(next) = state.next() {
        state = next;
        steps += 1;
        assert!(steps < 20, "state machine should terminate quickly");
    }
    assert_eq!(state, BuildState::Done);
}

#[test]
fn test_done_has_no_successor() {
    assert_eq!(BuildState::Done.next(), None);
}

#[test]
fn test_only_verified_and_extracted_are_idempotent() {
    for state in [
        BuildState::Init,
        BuildState::Downloaded,
        BuildState::Verified,
        BuildState::Extracted,
        BuildState::Patched,
        BuildState::DepsResolved,
        BuildState::Sandboxed,
        BuildState::Built,
        BuildState::PostProcessed,
        BuildState::Packaged,
        BuildState::Done,
    ] {
        let expected = matches!(state, BuildState::Verified | BuildState::Extracted);
        assert_eq!(state.is_idempotent(), expected, "{state:?}");
    }
}
