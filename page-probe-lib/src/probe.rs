//! Probe implementations for page rendering checks.
//!
//! This module defines the `Probe` trait, the seam between the batch runner
//! and the thing being exercised, plus `BrowserProbe`, the production
//! implementation that drives headless Chrome over the DevTools protocol.
//!
//! Each `BrowserProbe` invocation owns a dedicated browser process for its
//! whole lifetime: launch, navigate, capture, close. Keeping the capture
//! phase separate from the cleanup phase guarantees the browser is closed
//! on success, error, and timeout paths alike.

use crate::error::ProbeError;
use crate::types::{ProbeConfig, ProbeReading};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use futures_util::StreamExt;
use std::time::Instant;
use tracing::{debug, warn};

/// A single probe operation against a target URL.
///
/// Implementations must be safe to call concurrently from many tasks;
/// the runner shares one probe instance across a whole batch. The batch
/// runner only needs success/failure, but successful probes report a
/// `ProbeReading` so callers can sanity-check what was rendered.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Run one probe against `target`.
    async fn run(&self, target: &str) -> Result<ProbeReading, ProbeError>;
}

/// Validate a probe target URL.
///
/// This is a basic scheme check so obviously bad targets are rejected
/// before any browser process is launched.
pub fn validate_target(target: &str) -> Result<(), ProbeError> {
    let target = target.trim();

    if target.is_empty() {
        return Err(ProbeError::invalid_target(
            target,
            "Target URL cannot be empty",
        ));
    }

    if !target.starts_with("http://") && !target.starts_with("https://") {
        return Err(ProbeError::invalid_target(
            target,
            "Only http:// and https:// targets are supported",
        ));
    }

    Ok(())
}

/// Production probe that screenshots a page with headless Chrome.
///
/// Every invocation launches a fresh browser process, so probes are fully
/// independent of each other and nothing persists between tasks. That is
/// deliberate for load testing: each task pays the full rendering cost.
pub struct BrowserProbe {
    /// Configuration settings shared by all invocations of this probe
    config: ProbeConfig,
}

impl BrowserProbe {
    /// Create a new browser probe with default configuration.
    pub fn new() -> Self {
        Self {
            config: ProbeConfig::default(),
        }
    }

    /// Create a new browser probe with custom configuration.
    pub fn with_config(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Build the launch configuration for one headless Chrome instance.
    fn launch_config(&self) -> Result<BrowserConfig, ProbeError> {
        let (width, height) = self.config.window_size;

        BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .window_size(width, height)
            .build()
            .map_err(ProbeError::browser_launch)
    }

    /// Navigate to the target and capture a screenshot.
    ///
    /// Runs entirely against a browser owned by the caller, which remains
    /// responsible for closing it whatever this returns.
    async fn capture(browser: &Browser, target: &str, full_page: bool) -> Result<usize, ProbeError> {
        let page = browser
            .new_page(target)
            .await
            .map_err(|e| ProbeError::navigation(target, e.to_string()))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| ProbeError::navigation(target, e.to_string()))?;

        let bytes = page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(full_page)
                    .build(),
            )
            .await
            .map_err(|e| ProbeError::screenshot(target, e.to_string()))?;

        debug!(url = target, bytes = bytes.len(), "screenshot captured");
        Ok(bytes.len())
    }
}

impl Default for BrowserProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Probe for BrowserProbe {
    async fn run(&self, target: &str) -> Result<ProbeReading, ProbeError> {
        validate_target(target)?;

        let started = Instant::now();

        let (mut browser, mut handler) = Browser::launch(self.launch_config()?)
            .await
            .map_err(|e| ProbeError::browser_launch(e.to_string()))?;

        // The CDP handler pumps WebSocket messages between us and Chrome
        // for as long as the browser lives.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = tokio::time::timeout(
            self.config.probe_timeout,
            Self::capture(&browser, target, self.config.full_page),
        )
        .await;

        // Cleanup runs on every path: success, capture error, or timeout.
        if let Err(e) = browser.close().await {
            warn!(error = %e, "error closing browser after probe");
        }
        handler_task.abort();

        match result {
            Ok(Ok(bytes_captured)) => Ok(ProbeReading {
                bytes_captured,
                elapsed: started.elapsed(),
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ProbeError::timeout(
                format!("probe of {}", target),
                self.config.probe_timeout,
            )),
        }
    }
}
