//! Request counters shared between the server and the HTTP handler.
//!
//! Injected as `Arc<ServerStats>` rather than ambient globals; uses relaxed
//! atomics so the counters never contend with the job queue's lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct ServerStats {
    accepted: AtomicU64,
    handled: AtomicU64,
    handler_errors: AtomicU64,
    total_requests: AtomicU64,
    hello_requests: AtomicU64,
    not_found: AtomicU64,
}

#[derive(Clone, Copy, Debug)]
pub struct StatsSnapshot {
    pub accepted: u64,
    pub handled: u64,
    pub handler_errors: u64,
    pub total_requests: u64,
    pub hello_requests: u64,
    pub not_found: u64,
}

impl ServerStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_handled(&self) {
        self.handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_handler_errors(&self) {
        self.handler_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_total_requests(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_hello_requests(&self) {
        self.hello_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            handled: self.handled.load(Ordering::Relaxed),
            handler_errors: self.handler_errors.load(Ordering::Relaxed),
            total_requests: self.total_requests.load(Ordering::Relaxed),
            hello_requests: self.hello_requests.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }
}

/// Print counter deltas every `INTERVAL_SECS` until the process exits.
pub fn spawn_reporter(stats: Arc<ServerStats>) {
    const INTERVAL_SECS: u64 = 10;
    std::thread::spawn(move || {
        let mut last = stats.snapshot();
        loop {
            std::thread::sleep(Duration::from_secs(INTERVAL_SECS));
            let snap = stats.snapshot();
            println!(
                "stats delta {}s: accepted={} handled={} errors={} | http: total={} hello={} not_found={}",
                INTERVAL_SECS,
                snap.accepted.saturating_sub(last.accepted),
                snap.handled.saturating_sub(last.handled),
                snap.handler_errors.saturating_sub(last.handler_errors),
                snap.total_requests.saturating_sub(last.total_requests),
                snap.hello_requests.saturating_sub(last.hello_requests),
                snap.not_found.saturating_sub(last.not_found),
            );
            last = snap;
        }
    });
}
