// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! DAG construction, cycle breaking, and worker-pool execution for batch
//! package builds.

mod error;
mod graph;
mod progress;
mod scheduler;
mod worker;

pub use error::{Error, Result};
pub use graph::{break_cycles, build_graph, reverse_deps, select_work_set, Graph, SchedNode};
pub use progress::{Progress, RateLimiter};
pub use scheduler::{default_worker_count, run_scheduler};
pub use worker::{run_batch, BuildOutcome, Outcome, PackageBuilder, WorkerReport};
