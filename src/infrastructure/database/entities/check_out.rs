//! Check-out entity — a vehicle leaving the lot, with the billed amount

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::payment::PaymentMethod;

/// Settlement state of a check-out
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SettlementStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl Default for SettlementStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Paid => "paid",
        }
    }
}

/// Check-out model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "check_outs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// One check-out per check-in
    #[sea_orm(unique)]
    pub check_in_id: String,
    pub vehicle_id: String,
    /// Staff member who delivered the vehicle
    pub operator_id: Option<String>,
    pub exit_time: DateTime<Utc>,
    /// Whole minutes between entry and exit
    pub total_minutes: i64,
    /// Billed amount in minor currency units (centavos)
    pub total_amount: i64,
    /// Pricing profile the amount was computed with
    pub tariff_key: String,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: SettlementStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
