use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, error_response};

/// Router fallback returning the JSON error body instead of an empty 404.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound.default_message().to_string(),
        ErrorCode::NotFound,
    )
}
