// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! One-line `tracing` setup. Deliberately simpler than `spfs-cli-common`'s
//! `main!` macro, which also wires syslog and sentry reporting behind
//! `cfg(unix)` — out of scope for a build engine's own CLI.

use tracing_subscriber::EnvFilter;

/// Install a stderr-writing `tracing` subscriber, honoring `RUST_LOG` and
/// defaulting to `info` when it isn't set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
