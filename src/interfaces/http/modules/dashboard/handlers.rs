use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use super::dto::{
    DashboardSummary, LabelCount, MethodRevenue, OperationsReport, OperatorCount, RevenueParams,
    RevenueReport, SpotStats, VehicleStats,
};
use crate::domain::format_amount;
use crate::infrastructure::database::entities::{
    check_in, check_out, parking_spot,
    payment::{self, PaymentStatus},
    vehicle::{self, VehicleStatus, VehicleType},
};
use crate::interfaces::http::common::{ApiResponse, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::AppState;

/// Operational snapshot: occupancy, today's movements and revenue.
///
/// Aggregated live on every request; at this lot's scale a handful of
/// indexed queries is cheaper than keeping a summary table in sync.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/summary",
    tag = "dashboard",
    responses(
        (status = 200, description = "Snapshot", body = ApiResponse<DashboardSummary>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn summary(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<DashboardSummary>>> {
    let day_start = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now);

    let total_spots = parking_spot::Entity::find().count(&state.db).await?;
    let occupied_spots = parking_spot::Entity::find()
        .filter(parking_spot::Column::IsOccupied.eq(true))
        .count(&state.db)
        .await?;

    let vehicles_on_premises = vehicle::Entity::find()
        .filter(
            vehicle::Column::Status
                .is_in([VehicleStatus::Parked, VehicleStatus::ExitRequested]),
        )
        .count(&state.db)
        .await?;

    let check_ins_today = check_in::Entity::find()
        .filter(check_in::Column::EntryTime.gte(day_start))
        .count(&state.db)
        .await?;

    let todays_check_outs = check_out::Entity::find()
        .filter(check_out::Column::ExitTime.gte(day_start))
        .all(&state.db)
        .await?;
    let check_outs_today = todays_check_outs.len() as u64;
    let revenue_today: i64 = todays_check_outs.iter().map(|co| co.total_amount).sum();

    let approved_today = payment::Entity::find()
        .filter(payment::Column::Status.eq(PaymentStatus::Approved))
        .filter(payment::Column::PaidAt.gte(day_start))
        .all(&state.db)
        .await?;
    let mut by_method: BTreeMap<&'static str, i64> = BTreeMap::new();
    for p in &approved_today {
        *by_method.entry(p.method.as_str()).or_insert(0) += p.amount;
    }
    let revenue_by_method = by_method
        .into_iter()
        .map(|(method, amount)| MethodRevenue {
            method: method.to_string(),
            amount,
            amount_formatted: format_amount(amount),
        })
        .collect();

    Ok(Json(ApiResponse::ok(DashboardSummary {
        spots: SpotStats {
            total: total_spots,
            occupied: occupied_spots,
            free: total_spots.saturating_sub(occupied_spots),
        },
        vehicles_on_premises,
        check_ins_today,
        check_outs_today,
        revenue_today,
        revenue_today_formatted: format_amount(revenue_today),
        revenue_by_method,
    })))
}

/// Approved revenue over a period, broken down by method
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/revenue",
    tag = "dashboard",
    params(RevenueParams),
    responses(
        (status = 200, description = "Revenue report", body = ApiResponse<RevenueReport>),
        (status = 422, description = "Window end precedes start")
    ),
    security(("bearer_auth" = []))
)]
pub async fn revenue(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Query(params): Query<RevenueParams>,
) -> ApiResult<Json<ApiResponse<RevenueReport>>> {
    let to = params.to.unwrap_or_else(Utc::now);
    let from = params.from.unwrap_or_else(|| to - Duration::days(30));
    if to < from {
        return Err(crate::interfaces::http::common::ApiError::new(
            axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            "Window end precedes start",
        ));
    }

    let approved = payment::Entity::find()
        .filter(payment::Column::Status.eq(PaymentStatus::Approved))
        .filter(payment::Column::PaidAt.gte(from))
        .filter(payment::Column::PaidAt.lte(to))
        .all(&state.db)
        .await?;

    let total: i64 = approved.iter().map(|p| p.amount).sum();
    let count = approved.len() as u64;
    let average = if count == 0 { 0 } else { total / count as i64 };

    let mut by_method: BTreeMap<&'static str, i64> = BTreeMap::new();
    for p in &approved {
        *by_method.entry(p.method.as_str()).or_insert(0) += p.amount;
    }
    let by_method = by_method
        .into_iter()
        .map(|(method, amount)| MethodRevenue {
            method: method.to_string(),
            amount,
            amount_formatted: format_amount(amount),
        })
        .collect();

    Ok(Json(ApiResponse::ok(RevenueReport {
        from,
        to,
        total,
        total_formatted: format_amount(total),
        count,
        average,
        by_method,
    })))
}

/// Valet-floor statistics: stay lengths and per-operator check-ins today
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/operations",
    tag = "dashboard",
    responses(
        (status = 200, description = "Operations report", body = ApiResponse<OperationsReport>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn operations(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<OperationsReport>>> {
    let day_start = Utc::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now);

    let completed = check_out::Entity::find().all(&state.db).await?;
    let completed_stays = completed.len() as u64;
    let average_stay_minutes = if completed.is_empty() {
        0
    } else {
        completed.iter().map(|co| co.total_minutes).sum::<i64>() / completed.len() as i64
    };

    let todays_check_ins = check_in::Entity::find()
        .filter(check_in::Column::EntryTime.gte(day_start))
        .all(&state.db)
        .await?;
    let mut per_operator: BTreeMap<String, u64> = BTreeMap::new();
    for ci in &todays_check_ins {
        if let Some(operator_id) = &ci.operator_id {
            *per_operator.entry(operator_id.clone()).or_insert(0) += 1;
        }
    }
    let check_ins_by_operator = per_operator
        .into_iter()
        .map(|(operator_id, count)| OperatorCount { operator_id, count })
        .collect();

    Ok(Json(ApiResponse::ok(OperationsReport {
        completed_stays,
        average_stay_minutes,
        check_ins_by_operator,
    })))
}

/// Fleet breakdown by status and type
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/vehicles",
    tag = "dashboard",
    responses(
        (status = 200, description = "Vehicle stats", body = ApiResponse<VehicleStats>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn vehicle_stats(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<VehicleStats>>> {
    let total = vehicle::Entity::find().count(&state.db).await?;

    let mut by_status = Vec::new();
    for status in [
        VehicleStatus::Reserved,
        VehicleStatus::Parked,
        VehicleStatus::ExitRequested,
        VehicleStatus::Delivered,
    ] {
        let count = vehicle::Entity::find()
            .filter(vehicle::Column::Status.eq(status.clone()))
            .count(&state.db)
            .await?;
        by_status.push(LabelCount {
            label: status.as_str().to_string(),
            count,
        });
    }

    let mut by_type = Vec::new();
    for vehicle_type in [
        VehicleType::Car,
        VehicleType::Motorcycle,
        VehicleType::Van,
        VehicleType::Truck,
        VehicleType::Other,
    ] {
        let count = vehicle::Entity::find()
            .filter(vehicle::Column::VehicleType.eq(vehicle_type.clone()))
            .count(&state.db)
            .await?;
        by_type.push(LabelCount {
            label: vehicle_type.as_str().to_string(),
            count,
        });
    }

    Ok(Json(ApiResponse::ok(VehicleStats {
        total,
        by_status,
        by_type,
    })))
}
