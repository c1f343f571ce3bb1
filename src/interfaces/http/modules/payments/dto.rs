use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::format_amount;
use crate::infrastructure::database::entities::payment;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub check_out_id: String,
    /// One of: pix, credit_card, debit_card, cash, voucher
    #[validate(length(min = 1, message = "must not be empty"))]
    pub method: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentFilter {
    /// Filter by status: pending, processing, approved, cancelled
    pub status: Option<String>,
    /// Filter by method: pix, credit_card, debit_card, cash, voucher
    pub method: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub id: String,
    pub check_out_id: String,
    /// Amount in centavos
    pub amount: i64,
    pub amount_formatted: String,
    pub method: String,
    pub status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<payment::Model> for PaymentResponse {
    fn from(m: payment::Model) -> Self {
        Self {
            id: m.id,
            check_out_id: m.check_out_id,
            amount: m.amount,
            amount_formatted: format_amount(m.amount),
            method: m.method.as_str().to_string(),
            status: m.status.as_str().to_string(),
            paid_at: m.paid_at,
            created_at: m.created_at,
        }
    }
}
