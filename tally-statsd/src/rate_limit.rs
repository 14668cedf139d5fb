// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

fn time_since_arbitrary_epoch() -> Duration {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    Instant::now().duration_since(*EPOCH.get_or_init(Instant::now))
}

/// Lets an action through at most once per interval, across all threads.
///
/// A root [`StatsdClient`](crate::StatsdClient) and every client derived from it share one
/// limiter, so a missing agent produces one warning per interval rather than one per datagram.
/// Only second-level granularity is supported.
#[derive(Debug)]
pub(crate) struct RateLimit {
    interval_secs: u64,
    next_secs: AtomicU64,
}

impl RateLimit {
    pub(crate) fn new(interval: Duration) -> Self {
        debug_assert!(interval >= Duration::from_secs(1));
        Self {
            interval_secs: interval.as_secs(),
            next_secs: AtomicU64::new(0),
        }
    }

    /// True if the caller may act now.
    pub(crate) fn allow(&self) -> bool {
        self.allow_at(time_since_arbitrary_epoch().as_secs())
    }

    fn allow_at(&self, now_secs: u64) -> bool {
        let next = self.next_secs.load(Ordering::Relaxed);
        if now_secs < next {
            return false;
        }
        // losing the race means another thread got the slot
        self.next_secs
            .compare_exchange(
                next,
                now_secs.saturating_add(self.interval_secs),
                Ordering::Relaxed,
                Ordering::Relaxed,
            )
            .is_ok()
    }
}
