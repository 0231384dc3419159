use crate::models::NewEvent;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub category: String,
    pub name: String,
    pub data: Json,
    pub timestamp: DateTimeUtc,
    pub session_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Event {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            category: model.category,
            name: model.name,
            data: model.data,
            timestamp: model.timestamp,
            session_id: model.session_id,
        }
    }
}

// The id is assigned by the store
impl From<NewEvent> for ActiveModel {
    fn from(event: NewEvent) -> Self {
        ActiveModel {
            id: NotSet,
            category: Set(event.category),
            name: Set(event.name),
            data: Set(Json::Object(event.data)),
            timestamp: Set(event.timestamp),
            session_id: Set(event.session_id),
        }
    }
}
