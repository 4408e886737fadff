// Copyright (c) Contributors to the distri project.
// SPDX-License-Identifier: Apache-2.0

//! Rate-limited progress reporting
//! discipline": "Status-line mutations take a short-lived mutex").

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[cfg(test)]
#[path = "./progress_test.rs"]
mod progress_test;

/// Gates an action to at most once per `interval`, across however many
/// threads call [`RateLimiter::ready`] concurrently.
pub struct RateLimiter {
    interval: Duration,
    last: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: Mutex::new(Instant::now() - interval) }
    }

    /// Returns `true` at most once per `interval`; every other call within
    /// the window returns `false` without side effects.
    pub fn ready(&self) -> bool {
        let mut last = self.last.lock().expect("rate limiter mutex poisoned");
        if last.elapsed() < self.interval {
            return false;
        }
        *last = Instant::now();
        true
    }
}

/// The aggregate "k of n packages: s built, f failed" line, refreshed at
/// most once per 100ms.
pub struct Progress {
    bar: indicatif::ProgressBar,
    limiter: RateLimiter,
    total: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        let style = indicatif::ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")
            .expect("valid progress template")
            .progress_chars("=>-");
        let bar = indicatif::ProgressBar::new(total as u64).with_style(style);
        Self { bar, limiter: RateLimiter::new(Duration::from_millis(100)), total }
    }

    /// Refresh the line with the current built/failed counts, dropping the
    /// update if it arrives inside the rate-limit window.
    pub fn report(&self, built: usize, failed: usize) {
        if !self.limiter.ready() {
            return;
        }
        let settled = built + failed;
        self.bar.set_position(settled as u64);
        self.bar.set_message(format!("{settled} of {} packages: {built} built, {failed} failed", self.total));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
