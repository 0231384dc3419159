//! Events Domain
//!
//! Ingestion and querying of analytics events grouped into user sessions.
//!
//! # Architecture
//!
//! ```text
//! POST /events ──► validation ──► session upsert ──► event append
//!                      │                                  │
//!                      └──── IngestQueue (deferred) ──────┘
//!
//! GET /events/session/{id}    ─┐
//! GET /events/category/{name} ─┴──► event store (SQLite)
//! ```
//!
//! - [`validation`] checks timestamps and the payload shape required by each
//!   `(category, name)` pair.
//! - [`SessionUpsertService`] creates a session row if missing, tolerating
//!   concurrent creation.
//! - [`IngestionService`] runs validate → upsert → append, either inline or
//!   through the bounded [`IngestQueue`] drained by an [`IngestWorker`].

use utoipa::OpenApi;

mod config;
pub mod entity;
mod error;
mod handlers;
mod models;
mod repository;
mod service;
mod session;
mod sqlite;
pub mod validation;
mod worker;

pub use config::{IngestConfig, IngestMode};
pub use error::{EventError, EventResult, ValidationError};
pub use handlers::{EventsState, events_router};
pub use models::{CreateEvent, Event, NewEvent, Page, PageQuery, Session, SessionUpsert};
pub use repository::{EventRepository, SessionRepository};
pub use service::IngestionService;
pub use session::SessionUpsertService;
pub use sqlite::SqliteEventStore;
pub use validation::validate_event;
pub use worker::{IngestQueue, IngestStats, IngestStatsSnapshot, IngestWorker, ingest_channel};

/// OpenAPI documentation for the events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_event,
        handlers::list_session_events,
        handlers::list_category_events,
    ),
    components(
        schemas(CreateEvent, Event, axum_helpers::ErrorResponse),
        responses(
            axum_helpers::errors::responses::UnprocessableEntityResponse,
            axum_helpers::errors::responses::BadRequestJsonResponse,
            axum_helpers::errors::responses::InternalServerErrorResponse,
            axum_helpers::errors::responses::ServiceUnavailableResponse,
        )
    ),
    tags(
        (name = "events", description = "Event ingestion and session/category queries")
    )
)]
pub struct ApiDoc;
