//! Bounded concurrent batch runner.
//!
//! This module provides the fan-out/fan-in core of the library: it schedules
//! a fixed number of independent probe tasks while a counting semaphore
//! limits how many run simultaneously.
//!
//! Batch semantics:
//! - Every task in the request is spawned eagerly and runs to completion;
//!   an individual failure never cancels the rest of the batch.
//! - The semaphore is created per batch and dropped with it, so nothing is
//!   shared across requests.
//! - A task's permit is released only after its probe has returned, and the
//!   probe closes its browser before returning, so resources are always
//!   released before the permit goes back to the gate.

use crate::error::ProbeError;
use crate::probe::Probe;
use crate::types::{BatchReport, ProbeOutcome, ProbeRequest};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Run one batch of probes against the request's target.
///
/// Spawns exactly `request.total_tasks` tasks, each gated by a semaphore
/// with `request.concurrency` permits. Failed probes (including a probe
/// that panics) are caught, logged, and counted in the report; the batch
/// itself never fails.
///
/// # Example
///
/// ```rust,no_run
/// use page_probe_lib::{run_batch, BrowserProbe, ProbeRequest};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let request = ProbeRequest::new("https://www.example.com", 5, 2);
///     let report = run_batch(&request, Arc::new(BrowserProbe::new())).await;
///     println!("{}/{} probes succeeded", report.succeeded, report.total);
/// }
/// ```
pub async fn run_batch(request: &ProbeRequest, probe: Arc<dyn Probe>) -> BatchReport {
    let started = Instant::now();
    info!(
        url = %request.target,
        total = request.total_tasks,
        concurrency = request.concurrency,
        "starting probe batch"
    );

    // The gate lives for exactly one batch.
    let gate = Arc::new(Semaphore::new(request.concurrency));
    let mut handles = Vec::with_capacity(request.total_tasks);

    for index in 0..request.total_tasks {
        let gate = Arc::clone(&gate);
        let probe = Arc::clone(&probe);
        let target = request.target.clone();

        handles.push(tokio::spawn(async move {
            // Held until the probe has returned, i.e. until its browser
            // has been closed.
            let _permit = match gate.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // The gate is never closed while tasks hold it; this
                    // arm exists to avoid an unwrap.
                    return ProbeOutcome::failure(
                        index,
                        ProbeError::internal("concurrency gate closed unexpectedly").to_string(),
                    );
                }
            };

            match probe.run(&target).await {
                Ok(reading) => ProbeOutcome::success(index, reading),
                Err(e) => {
                    error!(task = index, error = %e, "probe task failed");
                    ProbeOutcome::failure(index, e.to_string())
                }
            }
        }));
    }

    // Fan-in: wait for every task. Outcomes are collected in spawn order,
    // so error ordering in the report follows task index.
    let mut outcomes = Vec::with_capacity(request.total_tasks);
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                error!(task = index, error = %e, "probe task panicked");
                outcomes.push(ProbeOutcome::failure(
                    index,
                    ProbeError::internal(format!("probe task panicked: {}", e)).to_string(),
                ));
            }
        }
    }

    let report = BatchReport::from_outcomes(&outcomes, started.elapsed());
    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        duration_ms = report.duration.as_millis() as u64,
        "probe batch finished"
    );
    report
}
