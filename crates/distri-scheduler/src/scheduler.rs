// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Top-level batch-build entry point: stitches graph construction,
//! cycle breaking, and worker-pool execution together behind one call.

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::SystemTime;

use distri_recipe::RecipeNode;

use crate::error::Result;
use crate::graph::{build_graph, break_cycles, select_work_set};
use crate::progress::Progress;
use crate::worker::{run_batch, Outcome, PackageBuilder, WorkerReport};

#[cfg(test)]
#[path = "./scheduler_test.rs"]
mod scheduler_test;

/// Worker slots to use by default: one per logical CPU
/// model").
pub fn default_worker_count() -> usize {
    num_cpus::get().max(1)
}

/// Run every recipe in `candidates` that is not already up to date,
/// respecting dependency order, reporting aggregate progress, and honoring
/// cancellation.
pub fn run_scheduler(
    candidates: &[RecipeNode],
    image_mtimes: &BTreeMap<String, SystemTime>,
    recipe_mtimes: &BTreeMap<String, SystemTime>,
    rebuild: bool,
    builder: &dyn PackageBuilder,
    worker_count: usize,
    cancelled: &Arc<AtomicBool>,
) -> Result<Vec<WorkerReport>> {
    let work_set = select_work_set(candidates, image_mtimes, recipe_mtimes, rebuild);
    if work_set.is_empty() {
        tracing::info!("nothing to build, all images up to date");
        return Ok(Vec::new());
    }

    let mut graph = build_graph(&work_set);
    break_cycles(&mut graph)?;

    let total = graph.nodes.len();
    tracing::info!(total, "starting batch build");
    let progress = Progress::new(total);

    let mut built = 0usize;
    let mut failed = 0usize;
    let reports = run_batch(&graph, builder, worker_count, cancelled, |report| {
        match report.outcome {
            Outcome::Built => built += 1,
            Outcome::Failed | Outcome::DependenciesUnmet => failed += 1,
        }
        progress.report(built, failed);
    })?;
    progress.finish();

    tracing::info!(built, failed, "batch build complete");
    Ok(reports)
}
