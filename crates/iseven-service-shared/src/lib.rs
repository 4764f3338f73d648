//! Shared infrastructure for the iseven HTTP service.
//!
//! This crate provides common functionality used by the service binary:
//!
//! - [`AppState`]: Shared, read-only evaluator configuration
//! - [`health_handler`]: Liveness probe for `GET /health`
//! - [`ProblemDetails`]: RFC 9457 Problem Details for consistent error responses
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: Structured JSON logging setup
//! - [`middleware`]: Per-request correlation context and metrics middleware
//! - Request and response bodies
//!
//! # Architecture
//!
//! The service follows a thin-handler pattern where the parity logic resides
//! in `iseven-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  RequestContextLayer (request_id, span)                     │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │  axum Handler                                         │  │
//! │  │  - Check method                                       │  │
//! │  │  - Decode request JSON                                │  │
//! │  │  - Call iseven-lib                                    │  │
//! │  │  - Format response                                    │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides state fixtures and a log capture sink.
//! Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::health_handler;
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_evaluation, record_evaluation_failed, MetricsConfig,
    MetricsError,
};
pub use middleware::{
    MetricsLayer, RequestContext, RequestContextLayer, RequestId, REQUEST_ID_HEADER,
};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_METHOD_NOT_ALLOWED,
};
pub use request::NumberRequest;
pub use response::{EvenResponse, HealthResponse};
pub use state::AppState;
