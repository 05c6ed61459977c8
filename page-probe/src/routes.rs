//! HTTP routes for the probe service.
//!
//! Endpoints:
//!   GET  /       - liveness message
//!   GET  /test   - run a probe batch (query parameters, legacy clients)
//!   POST /test   - run a probe batch (form parameters)
//!
//! The response body uses a legacy-friendly shape: `message` on success,
//! `Error` on failure, with per-task outcome counts added so callers can
//! tell partial failure from total failure. By default every response is
//! HTTP 200 and failure is signalled in the body; strict mode maps
//! failures to real status codes.

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use page_probe_lib::{run_batch, validate_target, Probe, ProbeRequest, ServerConfig};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Shared state for all request handlers.
///
/// Built once at startup; the probe is shared so tests can swap in a mock.
pub struct AppContext {
    /// Process-scoped service configuration
    pub config: ServerConfig,
    /// The probe every batch task invokes
    pub probe: Arc<dyn Probe>,
}

/// Parameters accepted by the /test endpoint.
///
/// Names and defaults are kept stable for existing clients.
#[derive(Debug, Clone, Deserialize)]
pub struct TestParams {
    /// Total number of probe tasks to run
    #[serde(default = "default_count")]
    pub num_of_test: usize,

    /// Maximum number of probes running at once
    #[serde(default = "default_count")]
    pub num_of_concurrent: usize,

    /// Target URL; falls back to the configured default when omitted
    #[serde(default)]
    pub url: Option<String>,
}

fn default_count() -> usize {
    1
}

/// Build the service router.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/test", get(run_test_query).post(run_test_form))
        .with_state(ctx)
}

/// Liveness endpoint.
async fn root() -> Json<Value> {
    Json(json!({"message": "This is a test endpoint"}))
}

/// GET /test with query parameters (what legacy clients call).
async fn run_test_query(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<TestParams>,
) -> (StatusCode, Json<Value>) {
    run_test(&ctx, params).await
}

/// POST /test with form parameters.
///
/// GET is kept for legacy clients even though the endpoint has side
/// effects; POST is the correct method, so both are served.
async fn run_test_form(
    State(ctx): State<Arc<AppContext>>,
    Form(params): Form<TestParams>,
) -> (StatusCode, Json<Value>) {
    run_test(&ctx, params).await
}

/// Validate the request, run the batch, and shape the JSON response.
async fn run_test(ctx: &AppContext, params: TestParams) -> (StatusCode, Json<Value>) {
    let target = params
        .url
        .unwrap_or_else(|| ctx.config.default_target.clone());

    if let Err(e) = validate_target(&target) {
        error!(error = %e, "rejecting probe batch");
        let status = if ctx.config.strict_status {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        };
        return (
            status,
            Json(json!({"Error": format!("An error occurred: {}", e)})),
        );
    }

    // Request counts are bounded by the service caps before the library's
    // own clamping lifts zeroes up to one.
    let request = ProbeRequest::new(
        &target,
        params.num_of_test.min(ctx.config.max_tasks),
        params.num_of_concurrent.min(ctx.config.max_concurrency),
    );

    info!(
        url = %request.target,
        total = request.total_tasks,
        concurrency = request.concurrency,
        "Starting Test"
    );

    let report = run_batch(&request, Arc::clone(&ctx.probe)).await;

    if report.is_success() {
        info!("Test Successful");
        (
            StatusCode::OK,
            Json(json!({
                "message": "Test Successful",
                "total": report.total,
                "succeeded": report.succeeded,
                "failed": report.failed,
            })),
        )
    } else {
        let first = report.first_error().unwrap_or("unknown error");
        error!(
            failed = report.failed,
            total = report.total,
            error = first,
            "An error occurred during the test"
        );
        let status = if ctx.config.strict_status {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };
        (
            status,
            Json(json!({
                "Error": format!("An error occurred: {}", first),
                "total": report.total,
                "succeeded": report.succeeded,
                "failed": report.failed,
                "errors": report.errors,
            })),
        )
    }
}
