#![allow(dead_code)]

use std::sync::OnceLock;

use axum_test::{TestResponse, TestServer};
use iseven_service::build_router;
use iseven_service_shared::test_utils::{accepting_state, test_state, CapturedLogs};
use iseven_service_shared::{AppState, MetricsConfig, REQUEST_ID_HEADER};

static LOGS: OnceLock<CapturedLogs> = OnceLock::new();

/// Process-wide log capture, installed before the first request of any test.
pub fn logs() -> &'static CapturedLogs {
    LOGS.get_or_init(|| {
        let logs = CapturedLogs::new();
        tracing::subscriber::set_global_default(logs.subscriber())
            .expect("global subscriber already set");
        logs
    })
}

fn server_for(state: AppState) -> TestServer {
    logs();
    TestServer::new(build_router(state, &MetricsConfig::default())).expect("test server")
}

/// Server with the default (rejecting) negative-number policy.
pub fn server() -> TestServer {
    server_for(test_state())
}

/// Server that evaluates negative numbers.
pub fn accepting_server() -> TestServer {
    server_for(accepting_state())
}

pub fn request_id(response: &TestResponse) -> String {
    response
        .header(REQUEST_ID_HEADER)
        .to_str()
        .expect("ascii request id")
        .to_string()
}
