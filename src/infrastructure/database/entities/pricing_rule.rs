//! Pricing rule entity — the authoritative tariff table
//!
//! One row per tariff profile. The legacy system duplicated these rate
//! tables across client screens; here they live in a single table and feed
//! the in-process tariff registry.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which calculator branch a rule configures
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum BillingModeKind {
    #[sea_orm(string_value = "tiered")]
    Tiered,
    #[sea_orm(string_value = "flat")]
    Flat,
}

impl BillingModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiered => "tiered",
            Self::Flat => "flat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tiered" => Some(Self::Tiered),
            "flat" => Some(Self::Flat),
            _ => None,
        }
    }
}

/// Pricing rule model
///
/// The amount columns are nullable because each billing mode uses a
/// different subset; the conversion into a domain `TariffProfile` rejects
/// rows whose columns are incomplete for their mode.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Registry lookup key, e.g. "avulso". Case-sensitive, unique.
    #[sea_orm(unique)]
    pub key: String,
    pub display_name: String,
    pub billing_mode: BillingModeKind,
    /// Tiered: amount for stays of up to 20 minutes (centavos)
    pub first_20_min_amount: Option<i64>,
    /// Tiered: amount for stays of 21-60 minutes (centavos)
    pub first_hour_amount: Option<i64>,
    /// Tiered: amount per additional started hour (centavos)
    pub additional_hour_amount: Option<i64>,
    /// Flat: fixed amount regardless of duration (centavos)
    pub fixed_amount: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
