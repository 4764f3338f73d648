//! Handler for the evaluation endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use iseven_service_shared::{
    from_lib_error, record_evaluation, record_evaluation_failed, AppState, EvenResponse,
    NumberRequest, ProblemDetails, RequestContext,
};

/// Handle requests to `/`.
///
/// Only `POST` with a `{"number": <int>}` body is accepted. The body is decoded
/// from the raw bytes so every malformed or non-conforming payload maps to 400,
/// independent of the `Content-Type` header.
pub async fn evaluate_handler(
    State(state): State<AppState>,
    context: RequestContext,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let request_id = context.request_id();

    info!(
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        remote_addr = %context.remote_addr_label(),
        "request received"
    );

    if method != Method::POST {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %uri.path(),
            "method not allowed"
        );
        return ProblemDetails::method_not_allowed(Method::POST, request_id.as_str())
            .into_response();
    }

    let request = match NumberRequest::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!(
                request_id = %request_id,
                error = %e,
                path = %uri.path(),
                "invalid request body"
            );
            record_evaluation_failed("invalid_body");
            return ProblemDetails::bad_request("Invalid request body", request_id.as_str())
                .into_response();
        }
    };

    let is_even = match state
        .evaluator()
        .evaluate(Some(request_id.as_str()), request.number)
    {
        Ok(is_even) => is_even,
        Err(e) => {
            error!(
                request_id = %request_id,
                error = %e,
                number = request.number,
                "error processing request"
            );
            record_evaluation_failed(e.reason());
            return from_lib_error(&e, request_id.as_str()).into_response();
        }
    };

    record_evaluation(is_even);
    info!(
        request_id = %request_id,
        number = request.number,
        is_even,
        "request completed successfully"
    );

    (StatusCode::OK, Json(EvenResponse { is_even })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use iseven_service_shared::test_utils::{accepting_state, test_request_context, test_state};

    async fn call(state: AppState, method: Method, body: &'static str) -> (StatusCode, String) {
        let response = evaluate_handler(
            State(state),
            test_request_context(),
            method,
            Uri::from_static("/"),
            Bytes::from_static(body.as_bytes()),
        )
        .await;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_even_number() {
        let (status, body) = call(test_state(), Method::POST, r#"{"number":4}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"is_even":true}"#);
    }

    #[tokio::test]
    async fn test_odd_number() {
        let (status, body) = call(test_state(), Method::POST, r#"{"number":7}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"is_even":false}"#);
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let (status, _) = call(test_state(), Method::GET, "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (status, body) = call(test_state(), Method::POST, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid request body"));
    }

    #[tokio::test]
    async fn test_negative_rejected_without_leaking_error() {
        let (status, body) = call(test_state(), Method::POST, r#"{"number":-3}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("negative numbers are not supported"));
        assert!(body.contains("Error processing request"));
    }

    #[tokio::test]
    async fn test_negative_accepted_by_policy() {
        let (status, body) = call(accepting_state(), Method::POST, r#"{"number":-3}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"is_even":false}"#);
    }
}
