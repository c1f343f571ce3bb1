use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct SpotStats {
    pub total: u64,
    pub occupied: u64,
    pub free: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MethodRevenue {
    pub method: String,
    /// Amount in centavos
    pub amount: i64,
    pub amount_formatted: String,
}

/// Live operational snapshot, aggregated on every request
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub spots: SpotStats,
    pub vehicles_on_premises: u64,
    pub check_ins_today: u64,
    pub check_outs_today: u64,
    /// Billed via today's check-outs, in centavos, whether or not settled
    /// yet. Settled-payment revenue is reported by the revenue endpoint.
    pub revenue_today: i64,
    pub revenue_today_formatted: String,
    /// Approved payments today, broken down by method
    pub revenue_by_method: Vec<MethodRevenue>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RevenueParams {
    /// Window start; defaults to 30 days ago
    pub from: Option<DateTime<Utc>>,
    /// Window end; defaults to now
    pub to: Option<DateTime<Utc>>,
}

/// Approved revenue over a period
#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueReport {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Sum in centavos
    pub total: i64,
    pub total_formatted: String,
    pub count: u64,
    /// Mean payment in centavos, 0 when there were none
    pub average: i64,
    pub by_method: Vec<MethodRevenue>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OperatorCount {
    pub operator_id: String,
    pub count: u64,
}

/// Valet-floor statistics
#[derive(Debug, Serialize, ToSchema)]
pub struct OperationsReport {
    pub completed_stays: u64,
    /// Mean stay length across all check-outs, in minutes
    pub average_stay_minutes: i64,
    /// Check-ins handled per operator today
    pub check_ins_by_operator: Vec<OperatorCount>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Fleet breakdown by status and type
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleStats {
    pub total: u64,
    pub by_status: Vec<LabelCount>,
    pub by_type: Vec<LabelCount>,
}
