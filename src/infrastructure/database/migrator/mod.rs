//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_parking_spots;
mod m20250301_000003_create_vehicles;
mod m20250301_000004_create_check_ins;
mod m20250301_000005_create_check_outs;
mod m20250301_000006_create_payments;
mod m20250301_000007_create_pricing_rules;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_parking_spots::Migration),
            Box::new(m20250301_000003_create_vehicles::Migration),
            Box::new(m20250301_000004_create_check_ins::Migration),
            Box::new(m20250301_000005_create_check_outs::Migration),
            Box::new(m20250301_000006_create_payments::Migration),
            Box::new(m20250301_000007_create_pricing_rules::Migration),
        ]
    }
}
