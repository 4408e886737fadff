// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Package identifiers, the `build.textproto` recipe format, and the
//! `.meta.textproto` file emitted alongside every built image.

mod builder;
mod cherry_pick;
mod digest;
mod error;
mod graph;
mod ident;
mod install;
mod meta;
mod parse;
mod recipe;
mod source;
mod split_package;
mod version;

pub use builder::{Builder, CConfig, CMakeConfig, GoConfig, GomodConfig, MesonConfig, PerlConfig, PythonConfig};
pub use cherry_pick::CherryPick;
pub use digest::input_digest;
pub use error::{Error, Result};
pub use graph::RecipeNode;
pub use ident::PackageIdent;
pub use install::{InstallDirective, InstallSpec};
pub use meta::Meta;
pub use parse::parse_recipe;
pub use recipe::Recipe;
pub use source::Source;
pub use split_package::{Claim, RuntimeUnion, SplitPackage};
pub use version::Version;
