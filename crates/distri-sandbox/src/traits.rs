// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Trait boundaries for the two external collaborators: the FUSE
//! server backing `/ro`, and the remote-builder service. Neither transport is
//! implemented here — the build driver calls through these traits, and a
//! real deployment supplies concrete implementations that speak the actual
//! FUSE control socket / gRPC protocol.

use std::path::Path;

use crate::error::Result;

/// The FUSE control interface that manages the `/ro` dependency union.
pub trait FuseControl {
    /// Rescan the repository for newly published packages.
    fn scan_packages(&self) -> Result<()>;

    /// Pre-create a directory inside the union, e.g. `/ro/<fullname>` before
    /// a destination directory is bind-mounted onto it.
    fn mkdir_all(&self, dir: &Path) -> Result<()>;

    /// Liveness check.
    fn ping(&self) -> Result<()>;
}

/// A single chunk of a file streamed to or from a remote builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub path: String,
    pub bytes: Vec<u8>,
}

/// A build delegated to a remote builder service: upload inputs, run the
/// build, download outputs.
pub trait RemoteBuilder {
    fn store(&self, chunks: &[Chunk]) -> Result<()>;
    fn build(&self, working_directory: &Path, input_paths: &[String]) -> Result<Vec<String>>;
    fn retrieve(&self, path: &str) -> Result<Vec<u8>>;
}
