//! Create check_ins table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CheckIns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckIns::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CheckIns::TicketNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CheckIns::VehicleId).string().not_null())
                    .col(ColumnDef::new(CheckIns::SpotId).string())
                    .col(ColumnDef::new(CheckIns::OperatorId).string())
                    .col(
                        ColumnDef::new(CheckIns::EntryTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CheckIns::ExpectedExitTime).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(CheckIns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_check_ins_vehicle")
                    .table(CheckIns::Table)
                    .col(CheckIns::VehicleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckIns::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CheckIns {
    Table,
    Id,
    TicketNumber,
    VehicleId,
    SpotId,
    OperatorId,
    EntryTime,
    ExpectedExitTime,
    CreatedAt,
}
