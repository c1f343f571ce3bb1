//! Create pricing_rules table and seed the default tariff profiles

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricingRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::Key)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PricingRules::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(PricingRules::BillingMode)
                            .string()
                            .not_null()
                            .default("tiered"),
                    )
                    .col(ColumnDef::new(PricingRules::First20MinAmount).big_integer())
                    .col(ColumnDef::new(PricingRules::FirstHourAmount).big_integer())
                    .col(ColumnDef::new(PricingRules::AdditionalHourAmount).big_integer())
                    .col(ColumnDef::new(PricingRules::FixedAmount).big_integer())
                    .col(
                        ColumnDef::new(PricingRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PricingRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the default profiles. Amounts are in centavos.
        let now = chrono::Utc::now().to_rfc3339();
        let mut insert = Query::insert()
            .into_table(PricingRules::Table)
            .columns([
                PricingRules::Key,
                PricingRules::DisplayName,
                PricingRules::BillingMode,
                PricingRules::First20MinAmount,
                PricingRules::FirstHourAmount,
                PricingRules::AdditionalHourAmount,
                PricingRules::FixedAmount,
                PricingRules::IsActive,
                PricingRules::CreatedAt,
                PricingRules::UpdatedAt,
            ])
            .to_owned();

        // key, display name, (first 20 min, first hour, additional hour)
        let tiered: [(&str, &str, i64, i64, i64); 3] = [
            ("avulso", "Avulso", 500, 2000, 1000),
            ("mensalista", "Mensalista", 300, 2000, 500),
            ("convenio", "Convênio", 400, 2500, 800),
        ];
        for (key, name, first_20, first_hour, additional) in tiered {
            insert.values_panic([
                key.into(),
                name.into(),
                "tiered".into(),
                first_20.into(),
                first_hour.into(),
                additional.into(),
                Option::<i64>::None.into(),
                true.into(),
                now.clone().into(),
                now.clone().into(),
            ]);
        }

        // Flat day rate
        insert.values_panic([
            "diaria".into(),
            "Diária".into(),
            "flat".into(),
            Option::<i64>::None.into(),
            Option::<i64>::None.into(),
            Option::<i64>::None.into(),
            5000i64.into(),
            true.into(),
            now.clone().into(),
            now.into(),
        ]);

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricingRules::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum PricingRules {
    Table,
    Id,
    Key,
    DisplayName,
    BillingMode,
    #[iden = "first_20_min_amount"]
    First20MinAmount,
    FirstHourAmount,
    AdditionalHourAmount,
    FixedAmount,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
