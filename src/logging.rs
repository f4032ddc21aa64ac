//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::Error;

/// The request body fields whose values must never reach the log.
const REDACTED_FIELDS: [&str; 3] = ["password", "new_password", "reset_code"];

/// How many characters of a body are logged before truncating.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response bodies for each request.
///
/// Bodies are logged at the `debug` level and truncated at
/// [LOG_BODY_LENGTH_LIMIT] characters. Credential fields in JSON request
/// bodies ([REDACTED_FIELDS]) are redacted before logging.
///
/// # Errors
///
/// This function will return an error if the request body could not be read.
pub async fn logging_middleware(request: Request, next: Next) -> Result<Response, Error> {
    let (parts, body) = request.into_parts();
    let body_text = read_body_text(body)
        .await
        .map_err(|error| Error::InvalidField(format!("could not read the request body: {error}")))?;

    let display_text = if is_json(&parts.headers) {
        redact_fields(&body_text)
    } else {
        body_text.clone()
    };
    tracing::debug!(
        "received {} {} with body: {}",
        parts.method,
        parts.uri,
        truncate_for_log(&display_text)
    );

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match read_body_text(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("could not read the response body for logging: {error}");
            return Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
    };

    tracing::debug!(
        "sending {} with body: {}",
        parts.status,
        truncate_for_log(&body_text)
    );

    Ok(Response::from_parts(parts, body_text.into()))
}

fn is_json(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .is_some_and(|content_type| content_type.as_bytes().starts_with(b"application/json"))
}

async fn read_body_text(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// Replace the values of [REDACTED_FIELDS] in a JSON object with asterisks.
///
/// Text that does not parse as JSON is returned as-is.
fn redact_fields(body_text: &str) -> String {
    let Ok(mut body) = serde_json::from_str::<Value>(body_text) else {
        return body_text.to_string();
    };

    if let Some(object) = body.as_object_mut() {
        for field in REDACTED_FIELDS {
            if let Some(field_value) = object.get_mut(field) {
                *field_value = Value::String("********".to_string());
            }
        }
    }

    body.to_string()
}

fn truncate_for_log(body_text: &str) -> String {
    if body_text.chars().count() > LOG_BODY_LENGTH_LIMIT {
        let truncated: String = body_text.chars().take(LOG_BODY_LENGTH_LIMIT).collect();

        format!("{truncated}...")
    } else {
        body_text.to_string()
    }
}
