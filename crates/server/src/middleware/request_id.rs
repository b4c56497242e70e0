//! Request correlation middleware.
//!
//! Tags every request with an `x-request-id`, either taken from an
//! upstream proxy or freshly generated, records it in the active tracing
//! span, and echoes it back in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Attach a request ID to the current span and the response.
///
/// An incoming `x-request-id` header wins; otherwise a fresh UUID v4 is
/// used. The `request_id` span field is declared by the trace layer's
/// span builder, so this middleware must run inside that layer.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
