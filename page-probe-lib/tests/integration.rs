// page-probe-lib/tests/integration.rs

//! Integration tests for the public batch-runner API using mock probes.
//!
//! These tests verify the runner's invariants without launching a real
//! browser: the concurrency ceiling, the exact invocation count, guaranteed
//! resource release, and failure aggregation.

use async_trait::async_trait;
use page_probe_lib::{
    run_batch, Probe, ProbeError, ProbeReading, ProbeRequest, MAX_CONCURRENCY, MAX_TASKS,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Mock probe that tracks resource lifecycle and concurrency.
///
/// Each `run` "opens" a resource, holds it for a fixed duration, and
/// "closes" it on every exit path, mirroring the browser probe's
/// launch/close discipline. A high-water mark records the largest number
/// of probes ever in flight at once.
struct TrackingProbe {
    hold: Duration,
    /// When set to n, every n-th call (by arrival order) fails
    fail_every: Option<usize>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

impl TrackingProbe {
    fn new(hold: Duration) -> Self {
        Self {
            hold,
            fail_every: None,
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
        }
    }

    fn failing_every(hold: Duration, n: usize) -> Self {
        Self {
            fail_every: Some(n),
            ..Self::new(hold)
        }
    }

    fn open_resource(&self) -> usize {
        let call = self.opened.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now, Ordering::SeqCst);
        call
    }

    fn close_resource(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Probe for TrackingProbe {
    async fn run(&self, target: &str) -> Result<ProbeReading, ProbeError> {
        let call = self.open_resource();
        tokio::time::sleep(self.hold).await;

        let result = match self.fail_every {
            Some(n) if call % n == 0 => Err(ProbeError::navigation(target, "mock failure")),
            _ => Ok(ProbeReading {
                bytes_captured: 64,
                elapsed: self.hold,
            }),
        };

        // Close on success and failure paths alike.
        self.close_resource();
        result
    }
}

#[tokio::test]
async fn five_tasks_two_concurrent_all_succeed() {
    let probe = Arc::new(TrackingProbe::new(Duration::from_millis(20)));
    let request = ProbeRequest::new("https://www.example.com", 5, 2);

    let report = run_batch(&request, probe.clone()).await;

    // Exactly 5 probe calls, never more than 2 at once.
    assert_eq!(probe.opened.load(Ordering::SeqCst), 5);
    assert!(probe.high_water.load(Ordering::SeqCst) <= 2);

    assert_eq!(report.total, 5);
    assert_eq!(report.succeeded, 5);
    assert_eq!(report.failed, 0);
    assert!(report.is_success());
}

#[tokio::test]
async fn concurrency_one_runs_sequentially() {
    let hold = Duration::from_millis(30);
    let probe = Arc::new(TrackingProbe::new(hold));
    let request = ProbeRequest::new("https://www.example.com", 3, 1);

    let started = Instant::now();
    let report = run_batch(&request, probe.clone()).await;
    let elapsed = started.elapsed();

    assert!(report.is_success());
    assert_eq!(probe.high_water.load(Ordering::SeqCst), 1);
    // Strictly sequential: wall time is at least 3x a single probe.
    assert!(
        elapsed >= hold * 3,
        "expected sequential execution, finished in {:?}",
        elapsed
    );
}

#[tokio::test]
async fn partial_failure_is_reported_without_aborting() {
    // Every third call fails; the batch still runs all tasks.
    let probe = Arc::new(TrackingProbe::failing_every(Duration::from_millis(5), 3));
    let request = ProbeRequest::new("https://www.example.com", 9, 4);

    let report = run_batch(&request, probe.clone()).await;

    assert_eq!(probe.opened.load(Ordering::SeqCst), 9);
    assert_eq!(report.total, 9);
    assert_eq!(report.failed, 3);
    assert_eq!(report.succeeded, 6);
    assert!(!report.is_success());
    assert_eq!(report.errors.len(), 3);
    for error in &report.errors {
        assert!(error.contains("mock failure"));
    }
}

#[tokio::test]
async fn no_resource_leaks_after_batch() {
    let probe = Arc::new(TrackingProbe::failing_every(Duration::from_millis(5), 2));
    let request = ProbeRequest::new("https://www.example.com", 8, 3);

    let _report = run_batch(&request, probe.clone()).await;

    // Every opened resource was closed, including those on failure paths.
    assert_eq!(
        probe.opened.load(Ordering::SeqCst),
        probe.closed.load(Ordering::SeqCst)
    );
    assert_eq!(probe.in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn high_concurrency_ceiling_holds_under_load() {
    let probe = Arc::new(TrackingProbe::new(Duration::from_millis(2)));
    let request = ProbeRequest::new("https://www.example.com", 50, 8);

    let report = run_batch(&request, probe.clone()).await;

    assert_eq!(report.total, 50);
    assert!(report.is_success());
    assert!(probe.high_water.load(Ordering::SeqCst) <= 8);
}

#[test]
fn request_construction_clamps_inputs() {
    let request = ProbeRequest::new("https://www.example.com", 0, 0);
    assert_eq!(request.total_tasks, 1);
    assert_eq!(request.concurrency, 1);

    let request = ProbeRequest::new("https://www.example.com", usize::MAX, usize::MAX);
    assert_eq!(request.total_tasks, MAX_TASKS);
    assert_eq!(request.concurrency, MAX_CONCURRENCY);
}
