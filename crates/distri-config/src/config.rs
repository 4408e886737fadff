// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Process-wide configuration for the build engine.
//!
//! Distinct from a [`distri_recipe::Recipe`] (per-package, immutable, read from
//! disk at build start) and a build context (per-build, mutated only by the
//! driver): a [`Config`] is process-wide and read-only once loaded, following
//! the `spk_config::Config` pattern of a single [`OnceCell`]-backed global
//! guarded by a lock, rather than ambient mutation from arbitrary call sites.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::Result;

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

static CONFIG: OnceCell<RwLock<Arc<Config>>> = OnceCell::new();

/// Repository paths and defaults used to locate recipes and published packages.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Repo {
    /// Root of the repository tree; `<root>/pkg` holds published images and
    /// meta files, `<root>/build` holds package recipe directories.
    pub root: String,
    /// Default target architecture used when a short name omits one.
    pub arch: String,
}

impl Default for Repo {
    fn default() -> Self {
        Self {
            root: String::new(),
            arch: "amd64".into(),
        }
    }
}

/// Defaults applied to an individual `distri build` invocation.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Build {
    /// Whether builds run inside the hermetic sandbox by default.
    pub hermetic: bool,
    /// Whether the FUSE dependency union is preferred over bind mounts.
    pub fuse: bool,
    /// Default number of parallel make/ninja jobs (`${DISTRI_JOBS}`).
    pub jobs: u32,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            hermetic: true,
            fuse: true,
            jobs: num_cpus(),
        }
    }
}

/// Defaults applied to a `distri batch` run.
#[derive(Clone, Default, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Scheduler {
    /// Number of parallel worker slots; zero means one per logical CPU.
    pub jobs: u32,
    /// How often (in milliseconds) the aggregate progress line may repaint.
    pub progress_interval_ms: u64,
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

/// Defaults controlling what the hermetic sandbox exposes from a dependency's
/// tree into the union at `/ro`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Sandbox {
    /// Directory names, relative to a dependency's own tree, promoted into
    /// the `/ro` union (e.g. `bin`, `lib`, `include`, `share/pkgconfig`).
    pub bind_mount_allowlist: Vec<String>,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self {
            bind_mount_allowlist: vec![
                "bin".into(),
                "lib".into(),
                "include".into(),
                "share/pkgconfig".into(),
            ],
        }
    }
}

/// Configuration values for the distri build engine.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub repo: Repo,
    pub build: Build,
    pub scheduler: Scheduler,
    pub sandbox: Sandbox,
}

impl Config {
    /// Get the current loaded config, loading it if needed.
    pub fn current() -> Result<Arc<Self>> {
        get_config()
    }

    /// Load the config from disk, even if it's already been loaded before.
    pub fn load() -> Result<Self> {
        load_config()
    }

    /// Make this config the current global one.
    pub fn make_current(self) -> Result<Arc<Self>> {
        let config = CONFIG.get_or_try_init(|| -> Result<RwLock<Arc<Config>>> {
            Ok(RwLock::new(Arc::new(self.clone())))
        })?;
        let mut lock = config
            .write()
            .map_err(|err| crate::Error::LockPoisonedWrite(err.to_string()))?;
        *Arc::make_mut(&mut lock) = self;
        Ok(Arc::clone(&lock))
    }

    /// The configured repo root, or an error if none was ever set.
    pub fn repo_root(&self) -> Result<PathBuf> {
        if self.repo.root.is_empty() {
            return Err(crate::Error::NoRepoRoot);
        }
        Ok(PathBuf::from(&self.repo.root))
    }
}

/// Get the current config, fetching it from disk if needed.
pub fn get_config() -> Result<Arc<Config>> {
    let config = CONFIG.get_or_try_init(|| -> Result<RwLock<Arc<Config>>> {
        Ok(RwLock::new(Arc::new(load_config()?)))
    })?;
    let lock = config
        .read()
        .map_err(|err| crate::Error::LockPoisonedRead(err.to_string()))?;
    Ok(Arc::clone(&*lock))
}

/// Load configuration from disk, even if it has already been loaded.
///
/// Layering, lowest to highest precedence: compiled-in defaults, `/etc/distri`,
/// `$XDG_CONFIG_HOME/distri/config` (any format `config` supports: toml, yaml,
/// json, ini), then `DISTRI_<SECTION>_<NAME>` environment variables.
pub fn load_config() -> Result<Config> {
    use config::{Config as RawConfig, File};

    let user_config = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs_config_home())
        .map(|dir| dir.join("distri").join("config"));

    let mut builder = RawConfig::builder().add_source(File::with_name("/etc/distri").required(false));

    if let Some(user_config) = user_config {
        builder = builder.add_source(File::with_name(&user_config.display().to_string()).required(false));
    }

    for (var, value) in std::env::vars() {
        let Some(tail) = var.strip_prefix("DISTRI_") else {
            continue;
        };
        let Some((section, name)) = tail.split_once('_') else {
            // A value with no section is not a configuration value
            // (e.g. DISTRI_BUILD_PROCESS, which is a sandbox marker, not config).
            continue;
        };
        let key = format!("{}.{}", section.to_lowercase(), name.to_lowercase());
        builder = builder.set_override(key, value)?;
    }

    let config = builder.build()?;
    Ok(Config::deserialize(config)?)
}

/// Minimal stand-in for `dirs::config_dir()` so this crate does not need the
/// full `dirs` dependency for a single fallback path.
fn dirs_config_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
}
