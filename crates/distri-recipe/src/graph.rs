// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! The recipe-graph node consumed by `distri-scheduler`.

use crate::version::Version;

/// One node in the source-level dependency graph built before any building
/// starts. `deps` names other *source* packages (not fully-qualified
/// images) — the scheduler resolves them against nodes already present in
/// the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeNode {
    /// Index of this node, assigned by the graph builder; stable for the
    /// lifetime of one scheduler run. Using indices into a slab rather than
    /// back-references avoids reference cycles in a systems-language port
    /// for languages with source-level dependency declarations.
    pub id: usize,
    pub pkg: String,
    pub full_name: String,
    pub version: Version,
    pub deps: Vec<String>,
}
