//! Request logging keyed by request id

use std::time::Instant;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use super::matched_path;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log each request once on completion.
///
/// The id normally comes from `SetRequestIdLayer`; a fresh one is generated
/// when the middleware runs without it. Does not open a span since
/// `TraceLayer` already owns the request span.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = matched_path(&request);
    let request_id = request_id(&request);
    let content_length = request
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            request_id = %request_id,
            "Request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms,
            content_length,
            request_id = %request_id,
            "Request completed"
        );
    }

    response
}

fn request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_from_header() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();

        assert_eq!(request_id(&request), "abc-123");
    }

    #[test]
    fn test_request_id_generated_when_missing() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let id = request_id(&request);

        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }
}
