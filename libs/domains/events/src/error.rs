//! Event domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde_json::{Value, json};
use thiserror::Error;

pub type EventResult<T> = Result<T, EventError>;

/// A domain rule rejected the event. Nothing has been written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("timestamp {timestamp} is later than the current time {now}")]
    FutureTimestamp {
        timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("data is missing required field '{field}' for {category}/{name}")]
    MissingPayloadField {
        category: String,
        name: String,
        field: &'static str,
    },

    #[error("data field '{field}' must be a JSON {expected}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Stable identifier reported in error details and logs.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::FutureTimestamp { .. } => "FUTURE_TIMESTAMP",
            Self::MissingPayloadField { .. } => "MISSING_PAYLOAD_FIELD",
            Self::InvalidFieldType { .. } => "INVALID_FIELD_TYPE",
        }
    }

    pub fn details(&self) -> Value {
        match self {
            Self::FutureTimestamp { timestamp, now } => json!({
                "rule": self.rule(),
                "timestamp": timestamp,
                "now": now,
            }),
            Self::MissingPayloadField {
                category,
                name,
                field,
            } => json!({
                "rule": self.rule(),
                "category": category,
                "name": name,
                "field": field,
            }),
            Self::InvalidFieldType { field, expected } => json!({
                "rule": self.rule(),
                "field": field,
                "expected": expected,
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid event: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    /// Raised by the store when a session id is already taken. The upsert
    /// service absorbs it.
    #[error("Session already exists: {0}")]
    SessionConflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DbErr),

    #[error("Ingest queue is closed")]
    QueueClosed,
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(e) => AppError::unprocessable(e.to_string(), Some(e.details())),
            EventError::InvalidInput(e) => AppError::ValidationError(e),
            EventError::SessionConflict(id) => {
                AppError::Conflict(format!("Session already exists: {}", id))
            }
            EventError::Storage(e) => AppError::Database(e),
            EventError::QueueClosed => {
                AppError::ServiceUnavailable("Event ingestion is shutting down".to_string())
            }
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
