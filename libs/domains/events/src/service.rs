//! Ingestion orchestration and read queries

use crate::error::EventResult;
use crate::models::{CreateEvent, Event, NewEvent, Page, Session};
use crate::repository::{EventRepository, SessionRepository};
use crate::session::SessionUpsertService;
use crate::validation::validate_event;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};
use validator::Validate;

/// The single write path: validate, upsert the session, append the event.
///
/// The upsert and the append are separate store operations. If the append
/// fails the session row stays behind, which is harmless.
pub struct IngestionService<R> {
    repository: Arc<R>,
    sessions: SessionUpsertService<R>,
}

impl<R: SessionRepository + EventRepository> IngestionService<R> {
    pub fn new(repository: R) -> Self {
        let repository = Arc::new(repository);
        Self {
            sessions: SessionUpsertService::new(Arc::clone(&repository)),
            repository,
        }
    }

    #[instrument(
        skip(self, event),
        fields(session_id = %event.session_id, category = %event.category, name = %event.name)
    )]
    pub async fn ingest(&self, event: CreateEvent) -> EventResult<Event> {
        event.validate()?;
        validate_event(&event, Utc::now())?;

        let upsert = self.sessions.upsert(&event.session_id).await?;
        let stored = self.repository.append(NewEvent::from(event)).await?;

        debug!(event_id = stored.id, ?upsert, "Event ingested");
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn list_by_session(&self, session_id: &str, page: Page) -> EventResult<Vec<Event>> {
        self.repository.list_by_session(session_id, page).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category: &str, page: Page) -> EventResult<Vec<Event>> {
        self.repository.list_by_category(category, page).await
    }

    pub async fn get_session(&self, id: &str) -> EventResult<Option<Session>> {
        self.repository.get_session(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EventError, ValidationError};
    use crate::repository::mock::MockStore;
    use chrono::Duration;
    use mockall::Sequence;
    use sea_orm::DbErr;
    use serde_json::{Value, json};

    fn pageview(session_id: &str, data: Value) -> CreateEvent {
        let Value::Object(data) = data else {
            panic!("payload must be an object");
        };
        CreateEvent {
            category: "page interaction".to_string(),
            name: "pageview".to_string(),
            data,
            timestamp: Utc::now() - Duration::seconds(5),
            session_id: session_id.to_string(),
        }
    }

    fn stored(event: NewEvent, id: i64) -> Event {
        Event {
            id,
            category: event.category,
            name: event.name,
            data: Value::Object(event.data),
            timestamp: event.timestamp,
            session_id: event.session_id,
        }
    }

    #[tokio::test]
    async fn test_ingest_upserts_then_appends() {
        let mut store = MockStore::new();
        let mut seq = Sequence::new();

        store
            .expect_insert_session()
            .withf(|id| id == "s1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_append()
            .withf(|e| e.session_id == "s1" && e.data["host"] == "example.com")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|e| Ok(stored(e, 1)));

        let service = IngestionService::new(store);
        let event = service
            .ingest(pageview("s1", json!({"host": "example.com", "path": "/"})))
            .await
            .unwrap();

        assert_eq!(event.id, 1);
        assert_eq!(event.data, json!({"host": "example.com", "path": "/"}));
    }

    #[tokio::test]
    async fn test_existing_session_still_appends() {
        let mut store = MockStore::new();
        store
            .expect_insert_session()
            .returning(|id| Err(EventError::SessionConflict(id.to_string())));
        store
            .expect_append()
            .times(1)
            .returning(|e| Ok(stored(e, 9)));

        let service = IngestionService::new(store);
        let event = service
            .ingest(pageview("s1", json!({"host": "h", "path": "/"})))
            .await
            .unwrap();
        assert_eq!(event.id, 9);
    }

    #[tokio::test]
    async fn test_rejected_event_writes_nothing() {
        let mut store = MockStore::new();
        store.expect_insert_session().never();
        store.expect_append().never();

        let service = IngestionService::new(store);
        let err = service
            .ingest(pageview("s1", json!({"host": "example.com"})))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EventError::Validation(ValidationError::MissingPayloadField { field: "path", .. })
        ));
    }

    #[tokio::test]
    async fn test_future_timestamp_writes_nothing() {
        let mut store = MockStore::new();
        store.expect_insert_session().never();
        store.expect_append().never();

        let mut event = pageview("s1", json!({"host": "h", "path": "/"}));
        event.timestamp = Utc::now() + Duration::hours(1);

        let err = IngestionService::new(store).ingest(event).await.unwrap_err();
        assert!(matches!(
            err,
            EventError::Validation(ValidationError::FutureTimestamp { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_session_id_is_invalid_input() {
        let mut store = MockStore::new();
        store.expect_insert_session().never();

        let err = IngestionService::new(store)
            .ingest(pageview("", json!({"host": "h", "path": "/"})))
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_append_failure_propagates() {
        let mut store = MockStore::new();
        store.expect_insert_session().returning(|_| Ok(()));
        store
            .expect_append()
            .returning(|_| Err(EventError::Storage(DbErr::Custom("database is locked".into()))));

        let err = IngestionService::new(store)
            .ingest(pageview("s1", json!({"host": "h", "path": "/"})))
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Storage(_)));
    }

    #[tokio::test]
    async fn test_reads_pass_the_clamped_page() {
        let mut store = MockStore::new();
        store
            .expect_list_by_category()
            .withf(|category, page| category == "video" && page.limit() == 100)
            .returning(|_, _| Ok(vec![]));

        let service = IngestionService::new(store);
        let events = service
            .list_by_category("video", Page::new(0, 1000))
            .await
            .unwrap();
        assert!(events.is_empty());
    }
}
