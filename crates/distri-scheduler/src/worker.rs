// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Worker-pool execution of a build graph
//! resources"). `built` and the graph are mutated only on this module's
//! main loop; workers only ever read a node and report back over the
//! completion channel.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::graph::{reverse_deps, Graph};

#[cfg(test)]
#[path = "./worker_test.rs"]
mod worker_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Built,
    Failed,
    DependenciesUnmet,
}

#[derive(Clone, Debug)]
pub struct WorkerReport {
    pub full_name: String,
    pub outcome: Outcome,
    pub duration: Duration,
    pub log_path: String,
}

/// What one worker got from trying to build a package. Built by whatever
/// actually runs the build driver as a subprocess; untestable in this crate
/// without a real build, so it is injected (mirrors
/// `distri_build::ProcessRunner`).
#[derive(Clone, Debug)]
pub struct BuildOutcome {
    pub success: bool,
    pub log_path: String,
}

pub trait PackageBuilder: Send + Sync {
    /// Build one package. `cancelled` is shared with the scheduler's
    /// cancellation token; a long-running implementation should poll it and
    /// terminate its subprocess if it flips.
    fn build(&self, full_name: &str, cancelled: &AtomicBool) -> BuildOutcome;
}

struct SharedQueue {
    ready: Mutex<VecDeque<usize>>,
    cvar: Condvar,
    done: AtomicBool,
}

/// Run every node in `graph` to completion, honoring dependency order and
/// marking unreachable work `DependenciesUnmet` without attempting to build
/// it. `on_report` is called once per settled node (built
/// or otherwise) so the caller can drive a progress display; it runs on the
/// scheduler's own thread, never a worker's.
pub fn run_batch(
    graph: &Graph,
    builder: &dyn PackageBuilder,
    worker_count: usize,
    cancelled: &Arc<AtomicBool>,
    mut on_report: impl FnMut(&WorkerReport),
) -> Result<Vec<WorkerReport>> {
    let n = graph.nodes.len();
    let reverse = reverse_deps(graph);
    let mut remaining_deps: Vec<usize> = graph.nodes.iter().map(|node| node.deps.len()).collect();

    let shared = Arc::new(SharedQueue { ready: Mutex::new(VecDeque::new()), cvar: Condvar::new(), done: AtomicBool::new(false) });
    {
        let mut ready = shared.ready.lock().expect("queue mutex poisoned");
        for (id, &deg) in remaining_deps.iter().enumerate() {
            if deg == 0 {
                ready.push_back(id);
            }
        }
    }

    let (report_tx, report_rx) = mpsc::channel::<(usize, WorkerReport)>();

    let reports = thread::scope(|scope| {
        for _ in 0..worker_count.max(1) {
            let shared = Arc::clone(&shared);
            let report_tx = report_tx.clone();
            let cancelled = Arc::clone(cancelled);
            scope.spawn(move || worker_loop(graph, builder, &shared, &cancelled, report_tx));
        }
        drop(report_tx);

        let mut built: HashMap<usize, Outcome> = HashMap::new();
        let mut reports: Vec<WorkerReport> = Vec::new();

        while built.len() < n && !cancelled.load(Ordering::Relaxed) {
            let (id, report) = match report_rx.recv() {
                Ok(pair) => pair,
                Err(_) => break,
            };

            let outcome = report.outcome;
            built.insert(id, outcome);
            on_report(&report);
            reports.push(report);

            if outcome == Outcome::Built {
                for &dependent in &reverse[id] {
                    if built.contains_key(&dependent) {
                        continue;
                    }
                    remaining_deps[dependent] -= 1;
                    if remaining_deps[dependent] == 0 {
                        shared.ready.lock().expect("queue mutex poisoned").push_back(dependent);
                        shared.cvar.notify_all();
                    }
                }
            } else {
                mark_unmet_transitively(graph, &reverse, id, &mut built, &mut reports, &mut on_report);
            }
        }

        shared.done.store(true, Ordering::Relaxed);
        shared.cvar.notify_all();
        reports
    });

    if cancelled.load(Ordering::Relaxed) {
        return Err(Error::Cancelled);
    }
    Ok(reports)
}

fn worker_loop(
    graph: &Graph,
    builder: &dyn PackageBuilder,
    shared: &SharedQueue,
    cancelled: &AtomicBool,
    report_tx: mpsc::Sender<(usize, WorkerReport)>,
) {
    loop {
        let id = {
            let mut ready = shared.ready.lock().expect("queue mutex poisoned");
            loop {
                if cancelled.load(Ordering::Relaxed) || shared.done.load(Ordering::Relaxed) {
                    return;
                }
                if let Some(id) = ready.pop_front() {
                    break id;
                }
                ready = shared.cvar.wait(ready).expect("queue mutex poisoned");
            }
        };

        let node = &graph.nodes[id];
        let start = Instant::now();
        let outcome = builder.build(&node.full_name, cancelled);
        let report = WorkerReport {
            full_name: node.full_name.clone(),
            outcome: if outcome.success { Outcome::Built } else { Outcome::Failed },
            duration: start.elapsed(),
            log_path: outcome.log_path,
        };
        if report_tx.send((id, report)).is_err() {
            return;
        }
    }
}

fn mark_unmet_transitively(
    graph: &Graph,
    reverse: &[Vec<usize>],
    failed: usize,
    built: &mut HashMap<usize, Outcome>,
    reports: &mut Vec<WorkerReport>,
    on_report: &mut impl FnMut(&WorkerReport),
) {
    let mut stack = vec![failed];
    while let Some(id) = stack.pop() {
        for &dependent in &reverse[id] {
            if built.contains_key(&dependent) {
                continue;
            }
            built.insert(dependent, Outcome::DependenciesUnmet);
            let report = WorkerReport {
                full_name: graph.nodes[dependent].full_name.clone(),
                outcome: Outcome::DependenciesUnmet,
                duration: Duration::ZERO,
                log_path: String::new(),
            };
            on_report(&report);
            reports.push(report);
            stack.push(dependent);
        }
    }
}
