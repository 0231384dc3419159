//! HTTP handlers for the events API

use crate::error::EventError;
use crate::models::{CreateEvent, Event, PageQuery};
use crate::repository::{EventRepository, SessionRepository};
use crate::service::IngestionService;
use crate::worker::IngestQueue;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_helpers::ValidatedJson;
use std::sync::Arc;
use tracing::instrument;

/// Shared by all event routes. `queue` is set in deferred mode.
pub struct EventsState<R> {
    pub service: Arc<IngestionService<R>>,
    pub queue: Option<IngestQueue>,
}

impl<R> Clone for EventsState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            queue: self.queue.clone(),
        }
    }
}

impl<R> EventsState<R> {
    pub fn sync(service: Arc<IngestionService<R>>) -> Self {
        Self {
            service,
            queue: None,
        }
    }

    pub fn deferred(service: Arc<IngestionService<R>>, queue: IngestQueue) -> Self {
        Self {
            service,
            queue: Some(queue),
        }
    }
}

/// Routes are declared with full paths so `/events` and `/events/` both match.
pub fn events_router<R>(state: EventsState<R>) -> Router
where
    R: SessionRepository + EventRepository + 'static,
{
    Router::new()
        .route("/events", post(create_event::<R>))
        .route("/events/", post(create_event::<R>))
        .route(
            "/events/session/{session_id}",
            get(list_session_events::<R>),
        )
        .route(
            "/events/category/{category}",
            get(list_category_events::<R>),
        )
        .with_state(state)
}

/// Ingest an event
///
/// Responds once the event is stored, or once it is queued when the service
/// runs in deferred mode.
#[utoipa::path(
    post,
    path = "/events/",
    request_body = CreateEvent,
    responses(
        (status = 204, description = "Event accepted"),
        (status = 400, response = axum_helpers::errors::responses::BadRequestJsonResponse),
        (status = 422, response = axum_helpers::errors::responses::UnprocessableEntityResponse),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse),
        (status = 503, response = axum_helpers::errors::responses::ServiceUnavailableResponse)
    ),
    tag = "events"
)]
#[instrument(
    skip(state, event),
    fields(session_id = %event.session_id, category = %event.category)
)]
pub async fn create_event<R>(
    State(state): State<EventsState<R>>,
    ValidatedJson(event): ValidatedJson<CreateEvent>,
) -> Result<StatusCode, EventError>
where
    R: SessionRepository + EventRepository,
{
    match &state.queue {
        Some(queue) => queue.submit(event).await?,
        None => {
            state.service.ingest(event).await?;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Events of one session, in insertion order
#[utoipa::path(
    get,
    path = "/events/session/{session_id}",
    params(
        ("session_id" = String, Path, description = "Session id"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Events of the session", body = Vec<Event>),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn list_session_events<R>(
    State(state): State<EventsState<R>>,
    Path(session_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Event>>, EventError>
where
    R: SessionRepository + EventRepository,
{
    let events = state
        .service
        .list_by_session(&session_id, page.into())
        .await?;
    Ok(Json(events))
}

/// Events of one category, in insertion order
#[utoipa::path(
    get,
    path = "/events/category/{category}",
    params(
        ("category" = String, Path, description = "Event category"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Events in the category", body = Vec<Event>),
        (status = 500, response = axum_helpers::errors::responses::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn list_category_events<R>(
    State(state): State<EventsState<R>>,
    Path(category): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Event>>, EventError>
where
    R: SessionRepository + EventRepository,
{
    let events = state
        .service
        .list_by_category(&category, page.into())
        .await?;
    Ok(Json(events))
}
