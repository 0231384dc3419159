//! SQLite-backed implementation of the session and event repositories

use crate::entity::{event, session};
use crate::error::{EventError, EventResult};
use crate::models::{Event, NewEvent, Page, Session};
use crate::repository::{EventRepository, SessionRepository};
use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};
use tracing::debug;

/// Each call checks a connection out of the pool and returns it when the
/// statement completes, on success and on error alike.
#[derive(Clone)]
pub struct SqliteEventStore {
    db: DatabaseConnection,
}

impl SqliteEventStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn list_where(
        &self,
        condition: impl sea_orm::sea_query::IntoCondition,
        page: Page,
    ) -> EventResult<Vec<Event>> {
        let models = event::Entity::find()
            .filter(condition)
            .order_by_asc(event::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl SessionRepository for SqliteEventStore {
    async fn insert_session(&self, id: &str) -> EventResult<()> {
        let model = session::ActiveModel {
            id: Set(id.to_string()),
        };

        match session::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(EventError::SessionConflict(id.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_session(&self, id: &str) -> EventResult<Option<Session>> {
        let model = session::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(Into::into))
    }
}

#[async_trait]
impl EventRepository for SqliteEventStore {
    async fn append(&self, new_event: NewEvent) -> EventResult<Event> {
        let model: event::ActiveModel = new_event.into();
        let model = model.insert(&self.db).await?;
        debug!(event_id = model.id, session_id = %model.session_id, "Appended event");
        Ok(model.into())
    }

    async fn list_by_session(&self, session_id: &str, page: Page) -> EventResult<Vec<Event>> {
        self.list_where(event::Column::SessionId.eq(session_id), page)
            .await
    }

    async fn list_by_category(&self, category: &str, page: Page) -> EventResult<Vec<Event>> {
        self.list_where(event::Column::Category.eq(category), page)
            .await
    }
}
