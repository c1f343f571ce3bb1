use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::infrastructure::database::entities::vehicle;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    /// License plate; stored uppercase
    #[validate(length(min = 5, max = 10, message = "must be 5-10 characters"))]
    pub plate: String,
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub model: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    /// One of: car, motorcycle, van, truck, other. Defaults to car.
    pub vehicle_type: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    /// Pricing profile key, e.g. "avulso". Defaults to "avulso".
    pub tariff_key: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 80, message = "must be 1-80 characters"))]
    pub model: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub vehicle_type: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub tariff_key: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VehicleFilter {
    /// Filter by lifecycle status
    pub status: Option<String>,
    /// Substring match on the plate, case-insensitive
    pub plate: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleResponse {
    pub id: String,
    pub plate: String,
    pub model: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub vehicle_type: String,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub tariff_key: String,
    pub status: String,
    pub spot_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<vehicle::Model> for VehicleResponse {
    fn from(m: vehicle::Model) -> Self {
        Self {
            id: m.id,
            plate: m.plate,
            model: m.model,
            brand: m.brand,
            color: m.color,
            vehicle_type: m.vehicle_type.as_str().to_string(),
            owner_name: m.owner_name,
            owner_phone: m.owner_phone,
            tariff_key: m.tariff_key,
            status: m.status.as_str().to_string(),
            spot_id: m.spot_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
