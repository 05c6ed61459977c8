//! Page Probe HTTP Service
//!
//! A minimal HTTP service for rudimentary load/smoke testing of page
//! rendering. One endpoint launches N headless-browser probes, bounded by a
//! concurrency limit, that each screenshot a target URL.
//!
//! The router is exposed from this library target so integration tests can
//! drive it in-process with a mock probe; `main.rs` only wires configuration
//! and binds the socket.

pub mod routes;

pub use routes::{build_router, AppContext, TestParams};
