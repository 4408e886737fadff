// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Translating a recipe's [`distri_recipe::Builder`] into the argv vectors
//! and environment additions that actually run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use distri_recipe::{Builder, CConfig, CMakeConfig, GoConfig, GomodConfig, MesonConfig, PerlConfig, PythonConfig};

use crate::context::BuildContext;
use crate::env::expand_vars;

#[cfg(test)]
#[path = "./builder_steps_test.rs"]
mod builder_steps_test;

/// One command to run during the build, before variable substitution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildStep {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    pub extra_env: BTreeMap<String, String>,
}

fn step(argv: &[&str], cwd: &PathBuf) -> BuildStep {
    BuildStep {
        argv: argv.iter().map(|s| s.to_string()).collect(),
        cwd: cwd.clone(),
        extra_env: BTreeMap::new(),
    }
}

fn destdir_env() -> BTreeMap<String, String> {
    BTreeMap::from([("DESTDIR".to_string(), "${DISTRI_DESTDIR}".to_string())])
}

fn plan_c(ctx: &BuildContext, cfg: &CConfig, target_triplet: &str, jobs: u32) -> Vec<BuildStep> {
    let mut steps = Vec::new();
    let work_dir = if cfg.copy_to_builddir {
        steps.push(step(
            &["cp", "-a", &format!("{}/.", ctx.source_dir.display()), &ctx.build_dir.display().to_string()],
            &ctx.source_dir,
        ));
        ctx.build_dir.clone()
    } else {
        ctx.source_dir.clone()
    };

    if cfg.autoreconf {
        steps.push(step(&["autoreconf", "-fi"], &work_dir));
    }

    let mut configure = vec![
        "./configure".to_string(),
        format!("--host={target_triplet}"),
        "--prefix=${DISTRI_PREFIX}".to_string(),
        "--sysconfdir=/etc".to_string(),
        "--disable-dependency-tracking".to_string(),
    ];
    configure.extend(cfg.configure_args.iter().cloned());
    steps.push(BuildStep { argv: configure, cwd: work_dir.clone(), extra_env: BTreeMap::new() });

    steps.push(step(&["make", &format!("-j{jobs}"), "V=1"], &work_dir));

    let mut install = step(&["make", "install", "DESTDIR=${DISTRI_DESTDIR}"], &work_dir);
    install.extra_env = destdir_env();
    steps.push(install);
    steps
}

fn plan_cmake(ctx: &BuildContext, cfg: &CMakeConfig, jobs: u32) -> Vec<BuildStep> {
    let mut configure = vec![
        "cmake".to_string(),
        "-G".to_string(),
        "Ninja".to_string(),
        "-DCMAKE_INSTALL_PREFIX=${DISTRI_PREFIX}".to_string(),
        "-DCMAKE_VERBOSE_MAKEFILE=ON".to_string(),
        ctx.source_dir.display().to_string(),
    ];
    configure.extend(cfg.configure_args.iter().cloned());

    let mut install = step(&["ninja", "install"], &ctx.build_dir);
    install.extra_env = destdir_env();

    vec![
        BuildStep { argv: configure, cwd: ctx.build_dir.clone(), extra_env: BTreeMap::new() },
        step(&["ninja", "-v", &format!("-j{jobs}")], &ctx.build_dir),
        install,
    ]
}

fn plan_meson(ctx: &BuildContext, cfg: &MesonConfig) -> Vec<BuildStep> {
    let mut configure = vec![
        "meson".to_string(),
        "setup".to_string(),
        ctx.build_dir.display().to_string(),
        ctx.source_dir.display().to_string(),
        "--prefix=${DISTRI_PREFIX}".to_string(),
    ];
    configure.extend(cfg.configure_args.iter().cloned());

    let mut install = step(&["ninja", "install"], &ctx.build_dir);
    install.extra_env = destdir_env();

    vec![
        BuildStep { argv: configure, cwd: ctx.build_dir.clone(), extra_env: BTreeMap::new() },
        step(&["ninja", "-v"], &ctx.build_dir),
        install,
    ]
}

fn plan_perl(ctx: &BuildContext, cfg: &PerlConfig) -> Vec<BuildStep> {
    let mut makefile_pl = vec![
        "perl".to_string(),
        "Makefile.PL".to_string(),
        "INSTALL_BASE=${DISTRI_PREFIX}".to_string(),
        "PREREQ_FATAL=true".to_string(),
    ];
    makefile_pl.extend(cfg.makefile_pl_args.iter().cloned());

    let mut install = step(&["make", "install", "DESTDIR=${DISTRI_DESTDIR}"], &ctx.build_dir);
    install.extra_env = destdir_env();

    vec![
        step(&["cp", "-a", &format!("{}/.", ctx.source_dir.display()), &ctx.build_dir.display().to_string()], &ctx.source_dir),
        BuildStep { argv: makefile_pl, cwd: ctx.build_dir.clone(), extra_env: BTreeMap::new() },
        step(&["make", "-j8", "V=1"], &ctx.build_dir),
        install,
    ]
}

fn plan_python(ctx: &BuildContext, cfg: &PythonConfig) -> Vec<BuildStep> {
    let mut argv = vec![
        "python3".to_string(),
        "setup.py".to_string(),
        "install".to_string(),
        "--prefix=${DISTRI_PREFIX}".to_string(),
        "--root=${DISTRI_DESTDIR}".to_string(),
    ];
    argv.extend(cfg.setup_py_args.iter().cloned());
    vec![BuildStep { argv, cwd: ctx.source_dir.clone(), extra_env: BTreeMap::new() }]
}

fn plan_gomod(ctx: &BuildContext, _cfg: &GomodConfig) -> Vec<BuildStep> {
    vec![step(
        &["cp", "-a", &format!("{}/.", ctx.source_dir.display()), "${DISTRI_DESTDIR}${DISTRI_PREFIX}/gopath/"],
        &ctx.source_dir,
    )]
}

fn plan_go(ctx: &BuildContext, _cfg: &GoConfig) -> Vec<BuildStep> {
    let mut env = BTreeMap::new();
    env.insert("GOSUMDB".to_string(), "off".to_string());
    env.insert("GOPROXY".to_string(), "off".to_string());
    env.insert("GOCACHE".to_string(), "${DISTRI_BUILDDIR}/gocache".to_string());
    env.insert("GOPATH".to_string(), "${DISTRI_BUILDDIR}/gopath".to_string());

    let mut install = step(&["go", "install", "-v"], &ctx.build_dir);
    install.extra_env = env;

    vec![
        step(&["cp", "-a", "${DISTRI_BUILDDIR}/gopath-ro/.", "${DISTRI_BUILDDIR}/gopath/"], &ctx.build_dir),
        step(&["cp", "-a", &format!("{}/.", ctx.source_dir.display()), &ctx.build_dir.display().to_string()], &ctx.source_dir),
        install,
    ]
}

/// Every `require <path> <version>` line in a `go.mod`.
fn required_import_paths(content: &str) -> Vec<String> {
    static REQUIRE_LINE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    let re = REQUIRE_LINE.get_or_init(|| regex::Regex::new(r"(?m)^\s*require\s+(\S+)\s+\S+\s*$").expect("valid regex"));
    re.captures_iter(content).map(|c| c[1].to_string()).collect()
}

/// Rewrite `go.mod` so that every required dependency with a matching
/// distri go-module package is pinned via a `replace` directive to the
/// resolved upstream version, instead of whatever `go install` would
/// otherwise resolve over the network.
pub fn rewrite_go_mod(content: &str, available: &BTreeMap<String, String>) -> String {
    let mut out = content.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    for import_path in required_import_paths(content) {
        if let Some(version) = available.get(&import_path) {
            out.push_str(&format!("\nreplace {import_path} => {import_path} {version}\n"));
        }
    }
    out
}

/// Translate a recipe's builder into the steps that actually run, or the
/// recipe's own explicit `build_step[]` verbatim.
pub fn plan_build_steps(ctx: &BuildContext, target_triplet: &str, jobs: u32) -> Vec<BuildStep> {
    match &ctx.recipe.builder {
        Builder::C(cfg) => plan_c(ctx, cfg, target_triplet, jobs),
        Builder::CMake(cfg) => plan_cmake(ctx, cfg, jobs),
        Builder::Meson(cfg) => plan_meson(ctx, cfg),
        Builder::Perl(cfg) => plan_perl(ctx, cfg),
        Builder::Python(cfg) => plan_python(ctx, cfg),
        Builder::Gomod(cfg) => plan_gomod(ctx, cfg),
        Builder::Go(cfg) => plan_go(ctx, cfg),
        Builder::Steps(steps) => steps
            .iter()
            .map(|argv| BuildStep { argv: argv.clone(), cwd: ctx.source_dir.clone(), extra_env: BTreeMap::new() })
            .collect(),
    }
}

/// Apply `${VAR}`/`${DISTRI_RESOLVE:pkg}` substitution to every argv element
/// and extra-env value of a planned build step.
pub fn substitute_step(step: &BuildStep, env: &BTreeMap<String, String>, resolved: &BTreeMap<String, String>) -> BuildStep {
    BuildStep {
        argv: step.argv.iter().map(|a| expand_vars(a, env, resolved)).collect(),
        cwd: step.cwd.clone(),
        extra_env: step
            .extra_env
            .iter()
            .map(|(k, v)| (k.clone(), expand_vars(v, env, resolved)))
            .collect(),
    }
}
