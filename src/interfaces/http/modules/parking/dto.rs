use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::infrastructure::database::entities::parking_spot;

#[derive(Debug, Serialize, ToSchema)]
pub struct SpotResponse {
    pub id: String,
    pub code: String,
    pub section: String,
    pub floor: i32,
    pub is_occupied: bool,
    pub is_reserved: bool,
    pub vehicle_id: Option<String>,
}

impl From<parking_spot::Model> for SpotResponse {
    fn from(m: parking_spot::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            section: m.section,
            floor: m.floor,
            is_occupied: m.is_occupied,
            is_reserved: m.is_reserved,
            vehicle_id: m.vehicle_id,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SpotFilter {
    /// Filter by section, e.g. "TER"
    pub section: Option<String>,
    /// When true, only free spots; when false, only occupied
    pub free: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckInRequest {
    /// Vehicle id. Either this or `plate` must be given.
    pub vehicle_id: Option<String>,
    /// License plate of an already registered vehicle
    pub plate: Option<String>,
    /// Preferred spot code, e.g. "SUB-07". First free spot when omitted.
    pub spot_code: Option<String>,
    pub expected_exit_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInResponse {
    pub id: String,
    pub ticket_number: String,
    pub vehicle_id: String,
    pub plate: String,
    pub spot_code: String,
    pub entry_time: DateTime<Utc>,
    pub expected_exit_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckOutRequest {
    /// Ticket to settle. Either this or `plate` must be given.
    pub ticket_number: Option<String>,
    pub plate: Option<String>,
    /// One of: pix, credit_card, debit_card, cash, voucher
    pub payment_method: Option<String>,
}

/// Receipt for a settled stay
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckOutResponse {
    pub id: String,
    pub ticket_number: String,
    pub plate: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub total_minutes: i64,
    /// Amount in centavos
    pub total_amount: i64,
    /// Amount as a decimal string, e.g. "30.00"
    pub total_amount_formatted: String,
    pub tariff_key: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveStayResponse {
    pub ticket_number: String,
    pub vehicle_id: String,
    pub plate: String,
    pub spot_code: Option<String>,
    pub entry_time: DateTime<Utc>,
    pub elapsed_minutes: i64,
    pub tariff_key: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RequestExitRequest {
    /// Vehicle id. Either this or `plate` must be given.
    pub vehicle_id: Option<String>,
    pub plate: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckOutHistoryItem {
    pub id: String,
    pub check_in_id: String,
    pub vehicle_id: String,
    pub exit_time: DateTime<Utc>,
    pub total_minutes: i64,
    /// Amount in centavos
    pub total_amount: i64,
    pub tariff_key: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInHistoryItem {
    pub id: String,
    pub ticket_number: String,
    pub vehicle_id: String,
    pub spot_id: Option<String>,
    pub entry_time: DateTime<Utc>,
    pub expected_exit_time: Option<DateTime<Utc>>,
}
