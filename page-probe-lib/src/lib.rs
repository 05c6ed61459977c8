//! # Page Probe Library
//!
//! A bounded-concurrency runner for headless-browser page rendering probes.
//!
//! This library provides the fan-out/fan-in core behind the page-probe
//! service: it schedules a fixed number of independent probe tasks, gates
//! them with a counting semaphore, and aggregates per-task outcomes into a
//! batch report.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use page_probe_lib::{run_batch, BrowserProbe, ProbeRequest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let request = ProbeRequest::new("https://www.example.com", 5, 2);
//!     let report = run_batch(&request, Arc::new(BrowserProbe::new())).await;
//!
//!     println!("{}/{} probes succeeded", report.succeeded, report.total);
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded Concurrency**: at most N probes in flight at any instant
//! - **No Fail-Fast**: individual failures never cancel the batch
//! - **Guaranteed Cleanup**: each probe closes its browser on every exit path
//! - **Mockable**: the `Probe` trait decouples the runner from Chrome

// Re-export main public API types and functions
// This makes them available as page_probe_lib::TypeName
pub use config::{load_env_config, EnvConfig, ServerConfig};
pub use error::ProbeError;
pub use probe::{validate_target, BrowserProbe, Probe};
pub use runner::run_batch;
pub use types::{
    BatchReport, ProbeConfig, ProbeOutcome, ProbeReading, ProbeRequest, MAX_CONCURRENCY, MAX_TASKS,
};

// Internal modules - these are not part of the public API surface
mod config;
mod error;
mod probe;
mod runner;
mod types;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ProbeError>;

// Library version metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
