// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! `distri batch`: build every stale recipe in dependency order.
//! Each package is built by re-executing `distri build` as
//! its own subprocess: `chroot`/`unshare` are process-wide, so a
//! worker thread here cannot safely sandbox itself without affecting every
//! other thread's in-flight build — re-exec gives each package its own
//! process and thus its own namespace.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Args;
use distri_scheduler::{BuildOutcome, Outcome, PackageBuilder};

use crate::discover;
use crate::error::Result;

#[cfg(test)]
#[path = "./cmd_batch_test.rs"]
mod cmd_batch_test;

#[derive(Args, Debug)]
pub struct Batch {
    /// Parallel worker slots; defaults to one per logical CPU.
    #[arg(long = "jobs")]
    pub jobs: Option<u32>,

    /// Print the batch's build order without building anything.
    #[arg(long = "dry_run", default_value_t = false)]
    pub dry_run: bool,

    /// Rebuild every candidate regardless of staleness.
    #[arg(long = "rebuild", default_value_t = false)]
    pub rebuild: bool,
}

/// Shells out to `distri build -pkg=<pkg>` for each node the scheduler hands
/// it, capturing output to `<pkg_dir>/build/batch.log`.
struct ReexecBuilder {
    distri_exe: PathBuf,
    repo_root: PathBuf,
}

impl PackageBuilder for ReexecBuilder {
    fn build(&self, full_name: &str, cancelled: &AtomicBool) -> BuildOutcome {
        let pkg = full_name.split('-').next().unwrap_or(full_name);
        let log_path = self.repo_root.join("build").join(pkg).join("batch.log");
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        if cancelled.load(std::sync::atomic::Ordering::SeqCst) {
            return BuildOutcome { success: false, log_path: log_path.display().to_string() };
        }

        let log = match std::fs::OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(f) => f,
            Err(err) => {
                tracing::warn!(%err, pkg, "failed to open batch log");
                return BuildOutcome { success: false, log_path: log_path.display().to_string() };
            }
        };

        let Ok(stdout_log) = log.try_clone() else {
            return BuildOutcome { success: false, log_path: log_path.display().to_string() };
        };
        let status = std::process::Command::new(&self.distri_exe).args(["build", "--pkg", pkg]).stdout(stdout_log).stderr(log).status();

        let success = matches!(status, Ok(status) if status.success());
        BuildOutcome { success, log_path: log_path.display().to_string() }
    }
}

pub fn run(args: &Batch) -> Result<()> {
    let config = distri_config::Config::current()?;
    let repo_root = config.repo_root()?;
    let arch = config.repo.arch.clone();

    let recipes = discover::discover_recipes(&repo_root)?;
    let candidates = discover::recipe_nodes(&recipes, &arch);
    let image_mtimes = discover::image_mtimes(&repo_root)?;
    let recipe_mtimes = discover::recipe_mtimes(&recipes)?;

    if args.dry_run {
        let work_set = distri_scheduler::select_work_set(&candidates, &image_mtimes, &recipe_mtimes, args.rebuild);
        for node in &work_set {
            println!("{}", node.full_name);
        }
        return Ok(());
    }

    let distri_exe = std::env::current_exe()?;
    let builder = ReexecBuilder { distri_exe, repo_root: repo_root.clone() };
    let worker_count = args.jobs.map(|n| n as usize).unwrap_or_else(distri_scheduler::default_worker_count);
    let cancelled = Arc::new(AtomicBool::new(false));

    let reports =
        distri_scheduler::run_scheduler(&candidates, &image_mtimes, &recipe_mtimes, args.rebuild, &builder, worker_count, &cancelled)?;

    let failed = reports.iter().filter(|r| r.outcome != Outcome::Built).count();
    for report in &reports {
        match report.outcome {
            Outcome::Built => println!("ok      {}", report.full_name),
            Outcome::Failed => println!("FAILED  {} (see {})", report.full_name, report.log_path),
            Outcome::DependenciesUnmet => println!("SKIPPED {} (dependency failed)", report.full_name),
        }
    }

    if failed > 0 {
        return Err(crate::error::Error::Other(format!("{failed} of {} packages failed", reports.len())));
    }
    Ok(())
}
