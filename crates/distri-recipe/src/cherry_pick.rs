// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

/// A single patch applied to the extracted source tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CherryPick {
    /// A patch file shipped alongside the recipe.
    Local { path: String },
    /// A patch fetched over HTTP at build time.
    Http { url: String },
}
