use crate::error::{EventError, EventResult};
use crate::models::SessionUpsert;
use crate::repository::SessionRepository;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Makes sure a session row exists, without a read-before-write.
///
/// The insert either creates the row or hits the primary key; a conflict
/// means another request got there first and counts as success.
pub struct SessionUpsertService<R> {
    repository: Arc<R>,
}

impl<R> Clone for SessionUpsertService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: SessionRepository> SessionUpsertService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn upsert(&self, session_id: &str) -> EventResult<SessionUpsert> {
        match self.repository.insert_session(session_id).await {
            Ok(()) => {
                debug!("Session created");
                Ok(SessionUpsert::Created)
            }
            Err(EventError::SessionConflict(_)) => {
                debug!("Session already exists");
                Ok(SessionUpsert::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }
}
