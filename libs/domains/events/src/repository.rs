//! Storage traits for sessions and events

use crate::error::EventResult;
use crate::models::{Event, NewEvent, Page, Session};
use async_trait::async_trait;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a session row.
    ///
    /// Fails with [`EventError::SessionConflict`](crate::EventError::SessionConflict)
    /// when the id already exists.
    async fn insert_session(&self, id: &str) -> EventResult<()>;

    async fn get_session(&self, id: &str) -> EventResult<Option<Session>>;
}

/// Append-only event storage. Reads are ordered by ascending id.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn append(&self, event: NewEvent) -> EventResult<Event>;

    async fn list_by_session(&self, session_id: &str, page: Page) -> EventResult<Vec<Event>>;

    async fn list_by_category(&self, category: &str, page: Page) -> EventResult<Vec<Event>>;
}
