//! Middleware that logs each request and its response.

use axum::{
    extract::Request,
    http::{HeaderMap, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

/// The maximum number of body bytes logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log each request and its response at the `info` level.
///
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level.
/// The `password` field of JSON request bodies is redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_parts_and_body_text_from_request(request).await;

    if parts.method == axum::http::Method::POST && has_json_content_type(&parts.headers) {
        let display_text = redact_password(&body_text);
        log_request(&parts, &display_text);
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_parts_and_body_text_from_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

fn redact_password(body_text: &str) -> String {
    let mut body: Value = match serde_json::from_str(body_text) {
        Ok(body) => body,
        Err(_) => return body_text.to_string(),
    };

    match body.get_mut("password") {
        Some(password) => *password = Value::String("********".to_string()),
        None => return body_text.to_string(),
    }

    body.to_string()
}

/// Check whether the Content-Type header names JSON, ignoring any parameters such as `charset`.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let media_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .unwrap_or("")
        .trim();

    media_type.eq_ignore_ascii_case("application/json")
}

async fn extract_parts_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_parts_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {:}...",
            truncate_to_char_boundary(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("The full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {:}...",
            truncate_to_char_boundary(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("The full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}

/// Cut `body` off at `limit` bytes, moving the cut back as needed so that it lands on a char
/// boundary. A body within the limit is returned whole.
fn truncate_to_char_boundary(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }

    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}



#[cfg(test)]
mod truncation_tests {
    use super::{LOG_BODY_LENGTH_LIMIT, truncate_to_char_boundary};

    #[test]
    fn keeps_body_within_limit_whole() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT);

        assert_eq!(truncate_to_char_boundary(&body, LOG_BODY_LENGTH_LIMIT), body);
    }

    #[test]
    fn cuts_ascii_body_at_the_limit() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT + 10);

        assert_eq!(
            truncate_to_char_boundary(&body, LOG_BODY_LENGTH_LIMIT),
            "a".repeat(LOG_BODY_LENGTH_LIMIT)
        );
    }

    #[test]
    fn cuts_before_a_char_straddling_the_limit() {
        // The 'é' occupies the two bytes either side of the limit, so a cut at the limit would
        // split it.
        let body = format!("{}é", "a".repeat(LOG_BODY_LENGTH_LIMIT - 1));

        assert_eq!(
            truncate_to_char_boundary(&body, LOG_BODY_LENGTH_LIMIT),
            "a".repeat(LOG_BODY_LENGTH_LIMIT - 1)
        );
    }
}
