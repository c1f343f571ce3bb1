//! Create vehicles table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Plate).string().not_null())
                    .col(ColumnDef::new(Vehicles::Model).string().not_null())
                    .col(ColumnDef::new(Vehicles::Brand).string())
                    .col(ColumnDef::new(Vehicles::Color).string())
                    .col(
                        ColumnDef::new(Vehicles::VehicleType)
                            .string()
                            .not_null()
                            .default("car"),
                    )
                    .col(ColumnDef::new(Vehicles::OwnerName).string())
                    .col(ColumnDef::new(Vehicles::OwnerPhone).string())
                    .col(
                        ColumnDef::new(Vehicles::TariffKey)
                            .string()
                            .not_null()
                            .default("avulso"),
                    )
                    .col(
                        ColumnDef::new(Vehicles::Status)
                            .string()
                            .not_null()
                            .default("reserved"),
                    )
                    .col(ColumnDef::new(Vehicles::SpotId).string())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vehicles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_plate")
                    .table(Vehicles::Table)
                    .col(Vehicles::Plate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Vehicles {
    Table,
    Id,
    Plate,
    Model,
    Brand,
    Color,
    VehicleType,
    OwnerName,
    OwnerPhone,
    TariffKey,
    Status,
    SpotId,
    CreatedAt,
    UpdatedAt,
}
