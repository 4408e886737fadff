// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! The per-package build driver: source resolution, hermetic-sandbox
//! handoff, builder dispatch, post-processing, and split-package packaging.

mod builder_steps;
mod context;
mod driver;
mod env;
mod error;
mod fetch;
mod package;
mod patch;
mod postprocess;
mod source;
mod state;
mod verify;

pub use builder_steps::{plan_build_steps, rewrite_go_mod, substitute_step, BuildStep};
pub use context::BuildContext;
pub use driver::{package, plan_sandbox, prepare_source, resolve_dependencies, run_build_steps, Driver, ImageWriter, ProcessRunner};
pub use env::{compute_env, compute_ldflags, expand_vars, order_deps_for_path_vars};
pub use error::{Error, Result};
pub use fetch::{materialize_empty, reuse_src_image, set_gomod_release_mtime, sync_distriroot, SourceFetcher};
pub use package::{image_name, partition_claims, CATCH_ALL};
pub use patch::apply_patch;
pub use postprocess::{debug_split, elf_deps, interpreter, libdir, pkgconfig, wrapper};
pub use source::{cache_file_name, extract_deb, extract_tar, extract_tar_gz, Downloader, HttpDownloader};
pub use state::BuildState;
pub use verify::verify_hash;
