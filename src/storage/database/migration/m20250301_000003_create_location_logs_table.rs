use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LocationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LocationLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LocationLogs::SellerId).string().not_null())
                    .col(ColumnDef::new(LocationLogs::SessionId).uuid().null())
                    .col(
                        ColumnDef::new(LocationLogs::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LocationLogs::Location).blob().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_logs_seller_id")
                            .from(LocationLogs::Table, LocationLogs::SellerId)
                            .to(Sellers::Table, Sellers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_location_logs_session_id")
                            .from(LocationLogs::Table, LocationLogs::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_location_logs_seller_id_recorded_at")
                    .table(LocationLogs::Table)
                    .col(LocationLogs::SellerId)
                    .col(LocationLogs::RecordedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_location_logs_session_id_recorded_at")
                    .table(LocationLogs::Table)
                    .col(LocationLogs::SessionId)
                    .col(LocationLogs::RecordedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LocationLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LocationLogs {
    Table,
    Id,
    SellerId,
    SessionId,
    RecordedAt,
    Location,
}

#[derive(DeriveIden)]
enum Sellers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
}
