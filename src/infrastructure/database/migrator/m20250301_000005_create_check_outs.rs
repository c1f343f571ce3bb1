//! Create check_outs table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CheckOuts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CheckOuts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CheckOuts::CheckInId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CheckOuts::VehicleId).string().not_null())
                    .col(ColumnDef::new(CheckOuts::OperatorId).string())
                    .col(
                        ColumnDef::new(CheckOuts::ExitTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CheckOuts::TotalMinutes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CheckOuts::TotalAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CheckOuts::TariffKey).string().not_null())
                    .col(ColumnDef::new(CheckOuts::PaymentMethod).string())
                    .col(
                        ColumnDef::new(CheckOuts::PaymentStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(CheckOuts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_check_outs_vehicle")
                    .table(CheckOuts::Table)
                    .col(CheckOuts::VehicleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckOuts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CheckOuts {
    Table,
    Id,
    CheckInId,
    VehicleId,
    OperatorId,
    ExitTime,
    TotalMinutes,
    TotalAmount,
    TariffKey,
    PaymentMethod,
    PaymentStatus,
    CreatedAt,
}
