// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! The builder one-of: `Builder = C(cfg) | CMake(cfg) | Meson(cfg) |
//! Perl(cfg) | Python(cfg) | Go(cfg) | Gomod(cfg) | Steps(argv[])`. The
//! build driver (`distri-build`) dispatches on this tag rather than probing
//! recipe fields at run time.

/// Options for the autotools (`./configure && make && make install`) builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CConfig {
    /// Copy the extracted source into the build directory before configuring
    /// (needed for build systems that write into the source tree).
    pub copy_to_builddir: bool,
    /// Run `autoreconf` before `configure`; pulls `autoconf`/`automake`/
    /// `libtool`/`gettext` into the effective build-dep set.
    pub autoreconf: bool,
    /// Extra arguments appended to the `configure` invocation.
    pub configure_args: Vec<String>,
}

/// Options for the CMake + Ninja builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CMakeConfig {
    pub configure_args: Vec<String>,
}

/// Options for the Meson + Ninja builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MesonConfig {
    pub configure_args: Vec<String>,
}

/// Options for the Perl (`ExtUtils::MakeMaker`) builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PerlConfig {
    pub makefile_pl_args: Vec<String>,
}

/// Options for the Python (`distutils`/`setup.py`) builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PythonConfig {
    pub setup_py_args: Vec<String>,
}

/// Options for the Go builder (`go install`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoConfig {
    /// The module's import path, used to compute the GOPATH layout and to
    /// match `go.mod` `replace` rewrites against available go-module
    /// packages.
    pub import_path: String,
}

/// Options for the Gomod builder: a module fetched purely to be vendored
/// into another package's GOPATH, never built on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GomodConfig {
    pub import_path: String,
}

/// The effective build procedure for a recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Builder {
    C(CConfig),
    CMake(CMakeConfig),
    Meson(MesonConfig),
    Perl(PerlConfig),
    Python(PythonConfig),
    Go(GoConfig),
    Gomod(GomodConfig),
    /// Explicit `build_step[]`: a fixed sequence of argv vectors, run with
    /// variable substitution in place of any builder dispatch.
    Steps(Vec<Vec<String>>),
}

impl Builder {
    pub fn kind(&self) -> &'static str {
        match self {
            Builder::C(_) => "cbuilder",
            Builder::CMake(_) => "cmakebuilder",
            Builder::Meson(_) => "mesonbuilder",
            Builder::Perl(_) => "perlbuilder",
            Builder::Python(_) => "pythonbuilder",
            Builder::Go(_) => "gobuilder",
            Builder::Gomod(_) => "gomodbuilder",
            Builder::Steps(_) => "build_step",
        }
    }
}
