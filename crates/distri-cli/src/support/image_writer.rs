// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! A real [`distri_build::ImageWriter`]: serialize a built output tree into a
//! squashfs image under the repo's package directory. This is the closest
//! real equivalent to the content-addressed, read-only image stores `spfs`'s
//! own storage layer builds (see DESIGN.md) and keeps image reads (mounted
//! read-only under `/ro`) cheap and copy-on-write-free.

use std::path::{Path, PathBuf};

use distri_build::{BuildState, Error, ImageWriter, Result};

pub struct SquashfsImageWriter {
    pkg_dir: PathBuf,
}

impl SquashfsImageWriter {
    pub fn new(pkg_dir: impl Into<PathBuf>) -> Self {
        Self { pkg_dir: pkg_dir.into() }
    }
}

impl ImageWriter for SquashfsImageWriter {
    /// Squash `dir` itself: the caller is responsible for `dir`'s immediate
    /// children already being the image's final layout (`bin/`, `out/`,
    /// `lib/`, `debug/`, a bare `out/` for a split, or a source tree).
    fn write_image(&self, full_name: &str, dir: &Path) -> Result<PathBuf> {
        let image_path = self.pkg_dir.join(format!("{full_name}.squashfs"));
        std::fs::create_dir_all(dir)?;

        let status = std::process::Command::new("mksquashfs")
            .arg(dir)
            .arg(&image_path)
            .args(["-noappend", "-all-root", "-no-progress"])
            .status()?;
        if !status.success() {
            return Err(Error::BuildStepFailed {
                stage: BuildState::Packaged,
                cause: format!("mksquashfs exited with {status}"),
                log_path: image_path.display().to_string(),
            });
        }
        Ok(image_path)
    }
}
