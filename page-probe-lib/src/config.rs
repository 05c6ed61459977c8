//! Service configuration and environment variable loading.
//!
//! This module defines the explicit process-scoped configuration struct used
//! by the HTTP server, replacing any implicit global state, and handles
//! loading overrides from `PP_*` environment variables with proper
//! precedence rules (defaults < environment < CLI flags).

use crate::types::{MAX_CONCURRENCY, MAX_TASKS};
use std::env;
use std::time::Duration;
use tracing::warn;

/// Process-scoped configuration for the probe service.
///
/// Built once at startup with defined initialization and never mutated
/// afterwards; handlers receive it through shared state.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    /// Default: "0.0.0.0"
    pub bind: String,

    /// Port the HTTP server listens on
    /// Default: 8000
    pub port: u16,

    /// Target URL used when a request omits `url`
    /// Default: "https://www.example.com"
    pub default_target: String,

    /// Upper bound on tasks accepted per batch
    /// Default: 100, capped by the library's MAX_TASKS
    pub max_tasks: usize,

    /// Upper bound on the concurrency limit accepted per batch
    /// Default: 25, capped by the library's MAX_CONCURRENCY
    pub max_concurrency: usize,

    /// Timeout for each individual probe
    /// Default: 30 seconds
    pub probe_timeout: Duration,

    /// Whether probes capture the full scrollable page
    /// Default: true
    pub full_page: bool,

    /// Whether failed batches produce non-200 HTTP status codes.
    /// Default: false, the legacy behavior: always answer 200 and signal
    /// failure in the body.
    pub strict_status: bool,
}

impl Default for ServerConfig {
    /// Create a sensible default configuration.
    ///
    /// Permissive status codes, example.com as the fallback target,
    /// conservative batch limits.
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            default_target: "https://www.example.com".to_string(),
            max_tasks: 100,
            max_concurrency: 25,
            probe_timeout: Duration::from_secs(30),
            full_page: true,
            strict_status: false,
        }
    }
}

impl ServerConfig {
    /// Set the bind address.
    pub fn with_bind<B: Into<String>>(mut self, bind: B) -> Self {
        self.bind = bind.into();
        self
    }

    /// Set the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the per-batch task cap. Clamped to 1..=MAX_TASKS.
    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks.clamp(1, MAX_TASKS);
        self
    }

    /// Set the per-batch concurrency cap. Clamped to 1..=MAX_CONCURRENCY.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    /// Set the per-probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Enable strict HTTP status codes for failed batches.
    pub fn with_strict_status(mut self, enabled: bool) -> Self {
        self.strict_status = enabled;
        self
    }

    /// The socket address string this config binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Apply environment overrides on top of this configuration.
    pub fn apply_env(mut self, env_config: &EnvConfig) -> Self {
        if let Some(ref bind) = env_config.bind {
            self.bind = bind.clone();
        }
        if let Some(port) = env_config.port {
            self.port = port;
        }
        if let Some(ref target) = env_config.default_target {
            self.default_target = target.clone();
        }
        if let Some(max_tasks) = env_config.max_tasks {
            self = self.with_max_tasks(max_tasks);
        }
        if let Some(max_concurrency) = env_config.max_concurrency {
            self = self.with_max_concurrency(max_concurrency);
        }
        if let Some(timeout) = env_config.probe_timeout {
            self.probe_timeout = timeout;
        }
        if let Some(full_page) = env_config.full_page {
            self.full_page = full_page;
        }
        if let Some(strict) = env_config.strict_status {
            self.strict_status = strict;
        }
        self
    }
}

/// Configuration values loaded from environment variables.
///
/// Each field is `None` when the corresponding variable is unset or invalid.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub default_target: Option<String>,
    pub max_tasks: Option<usize>,
    pub max_concurrency: Option<usize>,
    pub probe_timeout: Option<Duration>,
    pub full_page: Option<bool>,
    pub strict_status: Option<bool>,
}

/// Load configuration from `PP_*` environment variables.
///
/// Invalid values are logged as warnings and ignored rather than failing
/// startup.
pub fn load_env_config() -> EnvConfig {
    let mut env_config = EnvConfig::default();

    // PP_BIND - bind address
    if let Ok(bind) = env::var("PP_BIND") {
        if !bind.trim().is_empty() {
            env_config.bind = Some(bind.trim().to_string());
        }
    }

    // PP_PORT - listen port
    if let Ok(val) = env::var("PP_PORT") {
        match val.parse::<u16>() {
            Ok(port) if port > 0 => env_config.port = Some(port),
            _ => warn!("Invalid PP_PORT='{}', must be 1-65535", val),
        }
    }

    // PP_DEFAULT_URL - fallback target URL
    if let Ok(url) = env::var("PP_DEFAULT_URL") {
        if !url.trim().is_empty() {
            env_config.default_target = Some(url.trim().to_string());
        }
    }

    // PP_MAX_TASKS - per-batch task cap
    if let Ok(val) = env::var("PP_MAX_TASKS") {
        match val.parse::<usize>() {
            Ok(n) if n >= 1 && n <= MAX_TASKS => env_config.max_tasks = Some(n),
            _ => warn!("Invalid PP_MAX_TASKS='{}', must be 1-{}", val, MAX_TASKS),
        }
    }

    // PP_MAX_CONCURRENT - per-batch concurrency cap
    if let Ok(val) = env::var("PP_MAX_CONCURRENT") {
        match val.parse::<usize>() {
            Ok(n) if n >= 1 && n <= MAX_CONCURRENCY => env_config.max_concurrency = Some(n),
            _ => warn!(
                "Invalid PP_MAX_CONCURRENT='{}', must be 1-{}",
                val, MAX_CONCURRENCY
            ),
        }
    }

    // PP_PROBE_TIMEOUT - per-probe timeout in seconds
    if let Ok(val) = env::var("PP_PROBE_TIMEOUT") {
        match val.parse::<u64>() {
            Ok(secs) if secs >= 1 => {
                env_config.probe_timeout = Some(Duration::from_secs(secs));
            }
            _ => warn!("Invalid PP_PROBE_TIMEOUT='{}', must be seconds >= 1", val),
        }
    }

    // PP_FULL_PAGE - capture full page vs viewport
    if let Ok(val) = env::var("PP_FULL_PAGE") {
        match parse_bool(&val) {
            Some(flag) => env_config.full_page = Some(flag),
            None => warn!("Invalid PP_FULL_PAGE='{}', must be true/false", val),
        }
    }

    // PP_STRICT_STATUS - non-200 status codes on failure
    if let Ok(val) = env::var("PP_STRICT_STATUS") {
        match parse_bool(&val) {
            Some(flag) => env_config.strict_status = Some(flag),
            None => warn!("Invalid PP_STRICT_STATUS='{}', must be true/false", val),
        }
    }

    env_config
}

/// Parse common boolean spellings used in environment variables.
fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
