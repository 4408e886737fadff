// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use distri_recipe::{RecipeNode, Version};

use super::*;
use crate::graph::build_graph;

fn node(pkg: &str, deps: &[&str]) -> RecipeNode {
    RecipeNode {
        id: 0,
        pkg: pkg.to_string(),
        full_name: format!("{pkg}-amd64-1.0-1"),
        version: Version { upstream: "1.0".into(), distri_revision: 1 },
        deps: deps.iter().map(|d| d.to_string()).collect(),
    }
}

struct FakeBuilder {
    failures: Vec<String>,
}

impl PackageBuilder for FakeBuilder {
    fn build(&self, full_name: &str, _cancelled: &AtomicBool) -> BuildOutcome {
        let success = !self.failures.contains(&full_name.to_string());
        BuildOutcome { success, log_path: format!("/logs/{full_name}.log") }
    }
}

#[test]
fn test_run_batch_completes_every_node() {
    let work_set = vec![node("zlib", &[]), node("curl", &["zlib"]), node("wget", &["curl"])];
    let graph = build_graph(&work_set);
    let builder = FakeBuilder { failures: vec![] };
    let cancelled = Arc::new(AtomicBool::new(false));

    let reports = run_batch(&graph, &builder, 2, &cancelled, |_| {}).unwrap();

    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.outcome == Outcome::Built));
}

#[test]
fn test_run_batch_respects_dependency_order() {
    let work_set = vec![node("zlib", &[]), node("curl", &["zlib"]), node("wget", &["curl"])];
    let graph = build_graph(&work_set);
    let builder = FakeBuilder { failures: vec![] };
    let cancelled = Arc::new(AtomicBool::new(false));

    let reports = run_batch(&graph, &builder, 1, &cancelled, |_| {}).unwrap();

    let position = |name: &str| reports.iter().position(|r| r.full_name == name).unwrap();
    assert!(position("zlib-amd64-1.0-1") < position("curl-amd64-1.0-1"));
    assert!(position("curl-amd64-1.0-1") < position("wget-amd64-1.0-1"));
}

#[test]
fn test_run_batch_marks_transitive_dependents_unmet_on_failure() {
    let work_set = vec![node("zlib", &[]), node("curl", &["zlib"]), node("wget", &["curl"])];
    let graph = build_graph(&work_set);
    let builder = FakeBuilder { failures: vec!["zlib-amd64-1.0-1".to_string()] };
    let cancelled = Arc::new(AtomicBool::new(false));

    let reports = run_batch(&graph, &builder, 2, &cancelled, |_| {}).unwrap();

    let outcome_for = |name: &str| reports.iter().find(|r| r.full_name == name).unwrap().outcome;
    assert_eq!(outcome_for("zlib-amd64-1.0-1"), Outcome::Failed);
    assert_eq!(outcome_for("curl-amd64-1.0-1"), Outcome::DependenciesUnmet);
    assert_eq!(outcome_for("wget-amd64-1.0-1"), Outcome::DependenciesUnmet);
}

#[test]
fn test_run_batch_builds_independent_nodes_with_multiple_workers() {
    let work_set = vec![node("zlib", &[]), node("bzip2", &[])];
    let graph = build_graph(&work_set);
    let builder = FakeBuilder { failures: vec![] };
    let cancelled = Arc::new(AtomicBool::new(false));

    let reports = run_batch(&graph, &builder, 4, &cancelled, |_| {}).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.outcome == Outcome::Built));
}

#[test]
fn test_run_batch_invokes_on_report_for_every_settled_node() {
    let work_set = vec![node("zlib", &[]), node("curl", &["zlib"])];
    let graph = build_graph(&work_set);
    let builder = FakeBuilder { failures: vec![] };
    let cancelled = Arc::new(AtomicBool::new(false));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let seen_for_closure = Arc::clone(&seen);
    run_batch(&graph, &builder, 2, &cancelled, move |report| {
        seen_for_closure.lock().unwrap().push(report.full_name.clone());
    })
    .unwrap();

    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn test_run_batch_returns_cancelled_error_when_flagged_up_front() {
    let work_set = vec![node("zlib", &[])];
    let graph = build_graph(&work_set);
    let builder = FakeBuilder { failures: vec![] };
    let cancelled = Arc::new(AtomicBool::new(true));

    let err = run_batch(&graph, &builder, 1, &cancelled, |_| {}).unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

