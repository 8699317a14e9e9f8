//! Request ID middleware for request tracing

use axum::{
    extract::Request,
    http::{self, HeaderValue},
    middleware::Next,
    response::Response,
};
use tower_http::trace::MakeSpan;
use tracing::Span;
use uuid::Uuid;

/// Request ID stored in request extensions
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

/// Middleware that propagates `X-Request-ID` or generates one, and echoes it on the response
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("X-Request-ID")
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("X-Request-ID", header_value);
    }

    response
}

/// Request ID attached by [`request_id_middleware`], or `-` outside it.
pub fn request_id_of<B>(request: &http::Request<B>) -> &str {
    request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.as_str())
        .unwrap_or("-")
}

/// Span builder for `TraceLayer`; needs [`request_id_middleware`] as an outer layer.
#[derive(Clone, Debug, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &http::Request<B>) -> Span {
        tracing::info_span!(
            "http_request",
            http.method = %request.method(),
            http.target = %request.uri().path(),
            request_id = %request_id_of(request),
        )
    }
}
