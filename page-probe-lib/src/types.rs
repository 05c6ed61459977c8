//! Core data types for page rendering probes.
//!
//! This module defines all the main data structures used throughout the library,
//! including probe requests, per-task outcomes, and batch reports.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard upper bound on tasks per batch, to prevent resource exhaustion.
pub const MAX_TASKS: usize = 500;

/// Hard upper bound on concurrent probes, to prevent resource exhaustion.
pub const MAX_CONCURRENCY: usize = 100;

/// A request to run one batch of rendering probes.
///
/// Immutable for the duration of one run. Both counts are clamped into
/// valid ranges at construction time, so a request can always be executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeRequest {
    /// The URL each probe navigates to (e.g., "https://www.example.com")
    pub target: String,

    /// Total number of probe tasks to run.
    /// Clamped to 1..=MAX_TASKS.
    pub total_tasks: usize,

    /// Maximum number of probes running simultaneously.
    /// Clamped to 1..=MAX_CONCURRENCY.
    pub concurrency: usize,
}

impl ProbeRequest {
    /// Create a new probe request.
    ///
    /// Non-positive counts are clamped up to 1 and oversized counts are
    /// clamped down to the library maxima, so the resulting request always
    /// satisfies the runner's invariants.
    pub fn new<T: Into<String>>(target: T, total_tasks: usize, concurrency: usize) -> Self {
        Self {
            target: target.into(),
            total_tasks: total_tasks.clamp(1, MAX_TASKS),
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }
}

/// Measurements from one successful probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReading {
    /// Size of the captured screenshot in bytes
    pub bytes_captured: usize,

    /// How long the probe took end to end (launch, navigate, capture, close)
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Result of a single probe task within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Zero-based index of the task within its batch
    pub index: usize,

    /// Measurements when the probe succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<ProbeReading>,

    /// Error description when the probe failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeOutcome {
    /// Create an outcome for a successful probe.
    pub fn success(index: usize, reading: ProbeReading) -> Self {
        Self {
            index,
            reading: Some(reading),
            error: None,
        }
    }

    /// Create an outcome for a failed probe.
    pub fn failure<E: Into<String>>(index: usize, error: E) -> Self {
        Self {
            index,
            reading: None,
            error: Some(error.into()),
        }
    }

    /// Whether this task succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result for one batch of probes.
///
/// The batch surfaces every individual error (ordered by task index) rather
/// than just the first one, so callers can distinguish partial failure from
/// total failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Number of tasks that were scheduled (always equals the request's count)
    pub total: usize,

    /// Number of tasks that completed successfully
    pub succeeded: usize,

    /// Number of tasks that failed
    pub failed: usize,

    /// Error descriptions for every failed task, ordered by task index
    pub errors: Vec<String>,

    /// Wall-clock duration of the whole batch
    #[serde(skip)]
    pub duration: Duration,
}

impl BatchReport {
    /// Build a report from collected per-task outcomes.
    pub fn from_outcomes(outcomes: &[ProbeOutcome], duration: Duration) -> Self {
        let errors: Vec<String> = outcomes
            .iter()
            .filter_map(|o| o.error.clone())
            .collect();

        Self {
            total: outcomes.len(),
            succeeded: outcomes.len() - errors.len(),
            failed: errors.len(),
            errors,
            duration,
        }
    }

    /// Whether every task in the batch succeeded.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// The first error in task order, if any task failed.
    ///
    /// Convenience for callers that only want a single message; the full
    /// list is always available in `errors`.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Configuration options for browser probe operations.
///
/// This struct allows fine-tuning of the probe behavior, including
/// timeouts, rendering options, and browser flags.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Timeout for each individual probe (launch through close)
    /// Default: 30 seconds
    pub probe_timeout: Duration,

    /// Whether to capture the full scrollable page instead of the viewport
    /// Default: true
    pub full_page: bool,

    /// Browser window size as (width, height)
    /// Default: 1280x720
    pub window_size: (u32, u32),
}

impl Default for ProbeConfig {
    /// Create a sensible default configuration.
    ///
    /// These defaults mirror a typical smoke-test run: full-page capture
    /// with a generous per-probe timeout.
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(30),
            full_page: true,
            window_size: (1280, 720),
        }
    }
}

impl ProbeConfig {
    /// Set the per-probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Enable or disable full-page capture.
    pub fn with_full_page(mut self, enabled: bool) -> Self {
        self.full_page = enabled;
        self
    }

    /// Set the browser window size.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }
}
