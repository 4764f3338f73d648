//! HTTP middleware for the iseven service.
//!
//! This module provides:
//! - [`RequestId`]: Newtype for correlation IDs
//! - [`RequestContext`]: Per-request value carrying the correlation ID and peer address
//! - [`RequestContextLayer`]: Tower middleware that creates a fresh [`RequestContext`]
//!   for every inbound request
//! - [`MetricsLayer`]: Tower middleware for recording HTTP metrics
//!
//! # Request ID Propagation
//!
//! Every request gets a newly generated UUID v4. Inbound `X-Request-ID` headers
//! are ignored so two requests can never share an identifier. The ID is stored
//! as a typed [`RequestContext`] in the request extensions, attached to a
//! `request` tracing span, and echoed back in the `x-request-id` response header.
//!
//! # Metrics Recording
//!
//! The `MetricsLayer` records:
//! - `http_requests_total`: Counter by method, path, status bucket
//! - `http_request_duration_seconds`: Histogram by method, path
//!
//! The `path` label is the matched route template, or `unmatched` for requests
//! that fall through to the 404 fallback, so label cardinality stays bounded.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::{ConnectInfo, FromRequestParts, MatchedPath};
use http::{request::Parts, Extensions, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Response header carrying the request's correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Create a new request ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random UUID v4 request ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Request-scoped context created by [`RequestContextLayer`].
///
/// Read-only after creation. Handlers receive it through the axum extractor
/// implementation below and pass it down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: RequestId,
    remote_addr: Option<SocketAddr>,
}

impl RequestContext {
    pub fn new(request_id: RequestId, remote_addr: Option<SocketAddr>) -> Self {
        Self {
            request_id,
            remote_addr,
        }
    }

    /// Create a context with a freshly generated request ID.
    pub fn generate(remote_addr: Option<SocketAddr>) -> Self {
        Self::new(RequestId::generate(), remote_addr)
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Peer address for log fields, `-` when unknown.
    pub fn remote_addr_label(&self) -> String {
        self.remote_addr
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

fn connect_info(extensions: &Extensions) -> Option<SocketAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    /// Fetch the context stored by [`RequestContextLayer`].
    ///
    /// Falls back to a fresh context when the layer is not installed so a
    /// handler never runs without a correlation ID.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::generate(connect_info(&parts.extensions))))
    }
}

// =============================================================================
// RequestContextLayer - assigns a correlation ID to every request
// =============================================================================

/// Tower layer that attaches a fresh [`RequestContext`] to each request.
#[derive(Debug, Clone, Default)]
pub struct RequestContextLayer;

impl<S> Layer<S> for RequestContextLayer {
    type Service = RequestContextMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestContextMiddleware { inner }
    }
}

/// Middleware service created by [`RequestContextLayer`].
#[derive(Debug, Clone)]
pub struct RequestContextMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestContextMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = RequestContextFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let context = RequestContext::generate(connect_info(req.extensions()));

        let span = info_span!(
            "request",
            request_id = %context.request_id(),
            method = %req.method(),
            path = %req.uri().path(),
        );
        let header = HeaderValue::from_str(context.request_id().as_str()).ok();

        req.extensions_mut().insert(context);

        let inner = {
            let _enter = span.enter();
            self.inner.call(req)
        };

        RequestContextFuture {
            inner,
            span,
            header,
        }
    }
}

pin_project! {
    /// Future that polls the inner service inside the request span and
    /// stamps the correlation ID on the response.
    pub struct RequestContextFuture<F> {
        #[pin]
        inner: F,
        span: Span,
        header: Option<HeaderValue>,
    }
}

impl<F, ResBody, E> Future for RequestContextFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        match this.inner.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(mut response)) => {
                if let Some(value) = this.header.take() {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                Poll::Ready(Ok(response))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
        }
    }
}

// =============================================================================
// MetricsLayer - Tower middleware for HTTP metrics
// =============================================================================

/// Convert HTTP status code to bucket label.
///
/// Groups status codes into buckets: "2xx", "3xx", "4xx", "5xx".
fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Path label used when no route matched.
const UNMATCHED_PATH: &str = "unmatched";

fn path_label(extensions: &Extensions) -> String {
    extensions
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}

/// Tower layer for recording HTTP metrics.
///
/// Must sit inside [`RequestContextLayer`] so completion events can be tagged
/// with the request ID.
#[derive(Debug, Clone, Default)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsMiddleware { inner }
    }
}

/// Middleware service that records HTTP metrics.
#[derive(Debug, Clone)]
pub struct MetricsMiddleware<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = MetricsFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let method = req.method().to_string();
        let path = path_label(req.extensions());
        let request_id = req
            .extensions()
            .get::<RequestContext>()
            .map(|c| c.request_id().to_string())
            .unwrap_or_default();

        MetricsFuture {
            inner: self.inner.call(req),
            start: Instant::now(),
            method,
            path,
            request_id,
        }
    }
}

pin_project! {
    /// Future wrapper that records metrics on completion.
    pub struct MetricsFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        path: String,
        request_id: String,
    }
}

impl<F, ResBody, E> Future for MetricsFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        let result = match this.inner.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };

        let duration_secs = this.start.elapsed().as_secs_f64();
        let status = match &result {
            Ok(response) => response.status().as_u16(),
            Err(_) => 500,
        };

        metrics::counter!(
            "http_requests_total",
            "method" => this.method.clone(),
            "path" => this.path.clone(),
            "status" => status_bucket(status)
        )
        .increment(1);

        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => this.method.clone(),
            "path" => this.path.clone()
        )
        .record(duration_secs);

        tracing::debug!(
            request_id = %this.request_id,
            status,
            latency_ms = duration_secs * 1000.0,
            "request finished"
        );

        Poll::Ready(result)
    }
}
