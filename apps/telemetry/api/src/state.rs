//! Shared application state.

use database::sqlite::DatabaseConnection;
use domain_events::{EventsState, IngestQueue, IngestionService, SqliteEventStore};
use std::sync::Arc;

/// Cloned into every router; all fields are cheap handle clones.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Pool handle used for readiness checks and closed on shutdown
    pub db: DatabaseConnection,
    pub service: Arc<IngestionService<SqliteEventStore>>,
    /// Present when `INGEST_MODE=deferred`
    pub queue: Option<IngestQueue>,
}

impl AppState {
    pub fn events(&self) -> EventsState<SqliteEventStore> {
        match &self.queue {
            Some(queue) => EventsState::deferred(Arc::clone(&self.service), queue.clone()),
            None => EventsState::sync(Arc::clone(&self.service)),
        }
    }
}
