use axum::http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS for browser-side trackers posting events and dashboards reading them.
///
/// Only `GET`, `POST` and preflight `OPTIONS` are exposed; no credentials.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Parses configured origins into header values, skipping blanks.
pub fn parse_origins<S: AsRef<str>>(
    origins: &[S],
) -> Result<Vec<HeaderValue>, axum::http::header::InvalidHeaderValue> {
    origins
        .iter()
        .map(|o| o.as_ref().trim())
        .filter(|o| !o.is_empty())
        .map(HeaderValue::from_str)
        .collect()
}
