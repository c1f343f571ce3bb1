//! Create parking_spots table and seed the initial layout

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ParkingSpots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSpots::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ParkingSpots::Section).string().not_null())
                    .col(
                        ColumnDef::new(ParkingSpots::Floor)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::IsOccupied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ParkingSpots::IsReserved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ParkingSpots::VehicleId).string())
                    .col(
                        ColumnDef::new(ParkingSpots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the initial lot layout: ten spots per section.
        // TER = ground floor, SUB = basement, BAR = first floor.
        let mut insert = Query::insert()
            .into_table(ParkingSpots::Table)
            .columns([
                ParkingSpots::Id,
                ParkingSpots::Code,
                ParkingSpots::Section,
                ParkingSpots::Floor,
                ParkingSpots::IsOccupied,
                ParkingSpots::IsReserved,
                ParkingSpots::CreatedAt,
            ])
            .to_owned();

        let now = chrono::Utc::now().to_rfc3339();
        for (section, floor) in [("TER", 0), ("SUB", -1), ("BAR", 1)] {
            for number in 1..=10 {
                insert.values_panic([
                    uuid::Uuid::new_v4().to_string().into(),
                    format!("{}-{:02}", section, number).into(),
                    section.into(),
                    floor.into(),
                    false.into(),
                    false.into(),
                    now.clone().into(),
                ]);
            }
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ParkingSpots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ParkingSpots {
    Table,
    Id,
    Code,
    Section,
    Floor,
    IsOccupied,
    IsReserved,
    VehicleId,
    CreatedAt,
}
