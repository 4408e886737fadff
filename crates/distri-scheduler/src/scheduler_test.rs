// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use distri_recipe::Version;

use super::*;

fn node(pkg: &str, deps: &[&str]) -> RecipeNode {
    RecipeNode {
        id: 0,
        pkg: pkg.to_string(),
        full_name: format!("{pkg}-amd64-1.0-1"),
        version: Version { upstream: "1.0".into(), distri_revision: 1 },
        deps: deps.iter().map(|d| d.to_string()).collect(),
    }
}

struct RecordingBuilder {
    calls: Mutex<Vec<String>>,
}

impl PackageBuilder for RecordingBuilder {
    fn build(&self, full_name: &str, _cancelled: &AtomicBool) -> crate::worker::BuildOutcome {
        self.calls.lock().unwrap().push(full_name.to_string());
        crate::worker::BuildOutcome { success: true, log_path: format!("/logs/{full_name}.log") }
    }
}

#[test]
fn test_run_scheduler_skips_up_to_date_packages_without_building() {
    let candidates = vec![node("zlib", &[])];
    let now = std::time::SystemTime::now();
    let mut image_mtimes = BTreeMap::new();
    image_mtimes.insert("zlib-amd64-1.0-1".to_string(), now);
    let mut recipe_mtimes = BTreeMap::new();
    recipe_mtimes.insert("zlib".to_string(), now - std::time::Duration::from_secs(60));

    let builder = RecordingBuilder { calls: Mutex::new(vec![]) };
    let cancelled = Arc::new(AtomicBool::new(false));

    let reports = run_scheduler(&candidates, &image_mtimes, &recipe_mtimes, false, &builder, 2, &cancelled).unwrap();

    assert!(reports.is_empty());
    assert!(builder.calls.lock().unwrap().is_empty());
}

#[test]
fn test_run_scheduler_builds_stale_dependency_chain() {
    let candidates = vec![node("zlib", &[]), node("curl", &["zlib"])];
    let builder = RecordingBuilder { calls: Mutex::new(vec![]) };
    let cancelled = Arc::new(AtomicBool::new(false));

    let reports =
        run_scheduler(&candidates, &BTreeMap::new(), &BTreeMap::new(), false, &builder, 2, &cancelled).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.outcome == Outcome::Built));
}

#[test]
fn test_run_scheduler_breaks_cycles_before_building() {
    let candidates = vec![node("pkgconfig", &["glib"]), node("glib", &["pkgconfig"])];
    let builder = RecordingBuilder { calls: Mutex::new(vec![]) };
    let cancelled = Arc::new(AtomicBool::new(false));

    let reports =
        run_scheduler(&candidates, &BTreeMap::new(), &BTreeMap::new(), false, &builder, 2, &cancelled).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.outcome == Outcome::Built));
}

#[test]
fn test_default_worker_count_is_at_least_one() {
    assert!(default_worker_count() >= 1);
}
