use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(pk_auto(Events::Id))
                    .col(string(Events::Category))
                    .col(string(Events::Name))
                    .col(json(Events::Data))
                    .col(timestamp_with_time_zone(Events::Timestamp))
                    .col(string(Events::SessionId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_session_id")
                            .from(Events::Table, Events::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_session_id")
                    .table(Events::Table)
                    .col(Events::SessionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_category")
                    .table(Events::Table)
                    .col(Events::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Category,
    Name,
    Data,
    Timestamp,
    SessionId,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
}
