use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::infrastructure::database::entities::pricing_rule;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTariffRequest {
    /// Registry key, e.g. "avulso". Case-sensitive.
    #[validate(length(min = 1, max = 40, message = "must be 1-40 characters"))]
    pub key: String,
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub display_name: String,
    /// "tiered" or "flat"
    pub billing_mode: String,
    /// Tiered: amount for stays of up to 20 minutes (centavos)
    pub first_20_min_amount: Option<i64>,
    /// Tiered: amount for stays of 21-60 minutes (centavos)
    pub first_hour_amount: Option<i64>,
    /// Tiered: amount per additional started hour (centavos)
    pub additional_hour_amount: Option<i64>,
    /// Flat: fixed amount regardless of duration (centavos)
    pub fixed_amount: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTariffRequest {
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub display_name: Option<String>,
    pub billing_mode: Option<String>,
    pub first_20_min_amount: Option<i64>,
    pub first_hour_amount: Option<i64>,
    pub additional_hour_amount: Option<i64>,
    pub fixed_amount: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PreviewRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub tariff_key: String,
    /// Stay duration in whole minutes
    pub elapsed_minutes: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    pub tariff_key: String,
    pub elapsed_minutes: i64,
    /// Amount in centavos
    pub amount: i64,
    pub amount_formatted: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TariffResponse {
    pub key: String,
    pub display_name: String,
    pub billing_mode: String,
    pub first_20_min_amount: Option<i64>,
    pub first_hour_amount: Option<i64>,
    pub additional_hour_amount: Option<i64>,
    pub fixed_amount: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<pricing_rule::Model> for TariffResponse {
    fn from(m: pricing_rule::Model) -> Self {
        Self {
            key: m.key,
            display_name: m.display_name,
            billing_mode: m.billing_mode.as_str().to_string(),
            first_20_min_amount: m.first_20_min_amount,
            first_hour_amount: m.first_hour_amount,
            additional_hour_amount: m.additional_hour_amount,
            fixed_amount: m.fixed_amount,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
