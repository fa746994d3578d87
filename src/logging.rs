//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::ErrorDetail;

/// Bodies longer than this many bytes are truncated in the `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match buffer_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return (
                StatusCode::BAD_REQUEST,
                axum::Json(ErrorDetail::new("Could not read request body")),
            )
                .into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body);
    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &body_text,
    );

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let body = match buffer_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_body(
        &format!("Sending response: {}", parts.status),
        &String::from_utf8_lossy(&body),
    );

    Response::from_parts(parts, Body::from(body))
}

async fn buffer_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn log_body(summary: &str, body: &str) {
    match truncate(body, LOG_BODY_LENGTH_LIMIT) {
        Some(truncated) => {
            tracing::info!("{summary}\nbody: {truncated}...");
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{summary}\nbody: {body:?}"),
    }
}

/// Cut `text` to at most `limit` bytes without splitting a character.
///
/// Returns `None` if `text` already fits.
fn truncate(text: &str, limit: usize) -> Option<&str> {
    if text.len() <= limit {
        return None;
    }

    let end = (0..=limit)
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    Some(&text[..end])
}
