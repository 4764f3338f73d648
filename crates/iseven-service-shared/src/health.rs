//! Liveness probe handler.
//!
//! Serves `GET /health` with a fixed JSON status. The probe has no
//! dependencies and no side effects, so repeated calls always agree.

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info, warn};

use crate::{HealthResponse, ProblemDetails, RequestContext};

/// Liveness probe handler.
///
/// Mounted for every method; anything other than `GET` is answered with 405.
///
/// # Example
///
/// ```text
/// GET /health
/// {"status":"ok"}
/// ```
pub async fn health_handler(context: RequestContext, method: Method, uri: Uri) -> Response {
    let request_id = context.request_id();

    info!(
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        remote_addr = %context.remote_addr_label(),
        "health check received"
    );

    if method != Method::GET {
        warn!(
            request_id = %request_id,
            method = %method,
            "method not allowed on health endpoint"
        );
        return ProblemDetails::method_not_allowed(Method::GET, request_id.as_str())
            .into_response();
    }

    let response = (StatusCode::OK, Json(HealthResponse::ok())).into_response();
    debug!(request_id = %request_id, "health check completed successfully");
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequestId;

    fn context() -> RequestContext {
        RequestContext::new(RequestId::new("req-health"), None)
    }

    #[tokio::test]
    async fn test_health_get_ok() {
        let response = health_handler(context(), Method::GET, Uri::from_static("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_health_rejects_post() {
        let response = health_handler(context(), Method::POST, Uri::from_static("/health")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
