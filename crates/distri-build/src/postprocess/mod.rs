// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Post-processing: everything run between "the builder finished" and "the
//! output tree is ready to package" — wrapper generation, debug-symbol
//! splitting, and dependency scanning.

pub mod debug_split;
pub mod elf_deps;
pub mod interpreter;
pub mod libdir;
pub mod pkgconfig;
pub mod wrapper;
