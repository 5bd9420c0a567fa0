use axum::{
    body::{to_bytes, Body, Bytes},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        Request,
    },
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;
const MAX_LOGGED_BODY_BYTES: usize = 2048;

/// Logs every 4xx/5xx response with its latency, request id and a preview of
/// the JSON error body. The body is buffered and forwarded unchanged.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if !is_json {
        log_error_event(status.as_u16(), &method, &uri, &request_id, latency_ms, "");
        return response;
    }

    let (mut parts, body) = response.into_parts();
    match to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
        Ok(bytes) => {
            log_error_event(
                status.as_u16(),
                &method,
                &uri,
                &request_id,
                latency_ms,
                &preview(&bytes),
            );
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(err) => {
            parts.headers.remove(CONTENT_LENGTH);
            tracing::warn!(
                status = status.as_u16(),
                method = %method,
                uri = %uri,
                request_id = %request_id,
                error = ?err,
                "Failed to read error response body"
            );
            Response::from_parts(parts, Body::empty())
        }
    }
}

fn preview(bytes: &Bytes) -> String {
    if bytes.len() > MAX_LOGGED_BODY_BYTES {
        format!(
            "{}... (truncated, {} bytes total)",
            String::from_utf8_lossy(&bytes[..MAX_LOGGED_BODY_BYTES]),
            bytes.len()
        )
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

fn log_error_event(
    status: u16,
    method: &str,
    uri: &str,
    request_id: &str,
    latency_ms: u64,
    body_preview: &str,
) {
    if status >= 500 {
        tracing::error!(
            status,
            method,
            uri,
            request_id,
            latency_ms,
            body = body_preview,
            "Request completed with error status"
        );
    } else {
        tracing::warn!(
            status,
            method,
            uri,
            request_id,
            latency_ms,
            body = body_preview,
            "Request completed with error status"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_bodies() {
        let long = Bytes::from(vec![b'x'; MAX_LOGGED_BODY_BYTES + 10]);
        let text = preview(&long);
        assert!(text.ends_with(&format!("(truncated, {} bytes total)", MAX_LOGGED_BODY_BYTES + 10)));

        let short = Bytes::from_static(b"{\"error\":\"bad\"}");
        assert_eq!(preview(&short), "{\"error\":\"bad\"}");
    }
}
