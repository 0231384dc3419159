//! Error codes carried in every error body.
//!
//! Each code has a client-facing string (`"VALIDATION_ERROR"`), an integer for
//! logs and dashboards (`1001`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body failed field-level validation
    ValidationError,

    /// Request body could not be read as JSON of the expected shape
    JsonExtraction,

    NotFound,

    BadRequest,

    Conflict,

    /// Well-formed request rejected by a domain rule
    UnprocessableEntity,

    // Server errors
    InternalError,

    ServiceUnavailable,

    // Database errors (2000-2999)
    DatabaseError,

    /// No pooled connection could be acquired in time
    DatabasePoolTimeout,

    /// JSON serialization/deserialization error
    SerdeJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::Conflict => "CONFLICT",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// Ranges: 1000-1999 client errors, 2000-2999 database errors,
    /// 5000-5999 serialization errors.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Conflict => 1008,
            Self::UnprocessableEntity => 1009,
            Self::ServiceUnavailable => 1011,
            Self::BadRequest => 1012,

            Self::DatabaseError => 2003,
            Self::DatabasePoolTimeout => 2013,

            Self::SerdeJsonError => 5001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::JsonExtraction => "Failed to extract JSON from request body",
            Self::NotFound => "The requested resource was not found",
            Self::BadRequest => "Bad request",
            Self::Conflict => "Request conflicts with the current resource state",
            Self::UnprocessableEntity => "The request could not be processed",
            Self::InternalError => "An unexpected error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "A database error occurred",
            Self::DatabasePoolTimeout => "Database connection pool timed out",
            Self::SerdeJsonError => "Failed to process JSON data",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
