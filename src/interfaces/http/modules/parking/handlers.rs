use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use super::dto::{
    ActiveStayResponse, CheckInHistoryItem, CheckInRequest, CheckInResponse,
    CheckOutHistoryItem, CheckOutRequest, CheckOutResponse, RequestExitRequest, SpotFilter,
    SpotResponse,
};
use crate::interfaces::http::modules::vehicles::dto::VehicleResponse;
use crate::domain::{format_amount, DomainError, StayInterval};
use crate::infrastructure::database::entities::{
    check_in, check_out,
    check_out::SettlementStatus,
    parking_spot,
    payment::PaymentMethod,
    vehicle::{self, VehicleStatus},
};
use crate::interfaces::http::common::{
    validated_json::ValidatedJson, ApiError, ApiResponse, ApiResult, PaginatedResponse,
    PaginationParams,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::AppState;

const TICKET_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

fn generate_ticket_number() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..5)
        .map(|_| TICKET_CHARSET[rng.gen_range(0..TICKET_CHARSET.len())] as char)
        .collect();
    format!("TKT-{}-{}", Utc::now().timestamp_millis(), suffix)
}

async fn resolve_vehicle(
    state: &AppState,
    vehicle_id: Option<&str>,
    plate: Option<&str>,
) -> Result<vehicle::Model, ApiError> {
    match (vehicle_id, plate) {
        (Some(id), _) => vehicle::Entity::find_by_id(id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                ApiError::from(DomainError::NotFound {
                    entity: "vehicle",
                    id: id.to_string(),
                })
            }),
        (None, Some(plate)) => {
            let plate = plate.trim().to_uppercase();
            vehicle::Entity::find()
                .filter(vehicle::Column::Plate.eq(&plate))
                .one(&state.db)
                .await?
                .ok_or_else(|| {
                    ApiError::from(DomainError::NotFound {
                        entity: "vehicle",
                        id: plate,
                    })
                })
        }
        (None, None) => Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Either vehicle_id or plate is required",
        )),
    }
}

/// List parking spots, optionally by section or availability
#[utoipa::path(
    get,
    path = "/api/v1/parking/spots",
    tag = "parking",
    params(SpotFilter),
    responses(
        (status = 200, description = "Spots", body = ApiResponse<Vec<SpotResponse>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_spots(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Query(filter): Query<SpotFilter>,
) -> ApiResult<Json<ApiResponse<Vec<SpotResponse>>>> {
    let mut query = parking_spot::Entity::find();
    if let Some(section) = &filter.section {
        query = query.filter(parking_spot::Column::Section.eq(section.to_uppercase()));
    }
    if let Some(free) = filter.free {
        query = query.filter(parking_spot::Column::IsOccupied.eq(!free));
    }

    let spots: Vec<SpotResponse> = query
        .order_by_asc(parking_spot::Column::Code)
        .all(&state.db)
        .await?
        .into_iter()
        .map(SpotResponse::from)
        .collect();

    Ok(Json(ApiResponse::ok(spots)))
}

/// Check a vehicle in: assign a spot and issue a ticket
#[utoipa::path(
    post,
    path = "/api/v1/parking/check-in",
    tag = "parking",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Vehicle checked in", body = ApiResponse<CheckInResponse>),
        (status = 404, description = "Vehicle or spot not found"),
        (status = 409, description = "Vehicle already parked, or spot taken, or lot full")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_in(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<CheckInRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CheckInResponse>>)> {
    let vehicle = resolve_vehicle(
        &state,
        payload.vehicle_id.as_deref(),
        payload.plate.as_deref(),
    )
    .await?;

    if vehicle.status.is_on_premises() {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("Vehicle {} is already on the premises", vehicle.plate),
        ));
    }

    let spot = match &payload.spot_code {
        Some(code) => {
            let code = code.trim().to_uppercase();
            let spot = parking_spot::Entity::find()
                .filter(parking_spot::Column::Code.eq(&code))
                .one(&state.db)
                .await?
                .ok_or_else(|| {
                    ApiError::from(DomainError::NotFound {
                        entity: "parking spot",
                        id: code.clone(),
                    })
                })?;
            if spot.is_occupied {
                return Err(ApiError::new(
                    StatusCode::CONFLICT,
                    format!("Spot {code} is occupied"),
                ));
            }
            spot
        }
        None => parking_spot::Entity::find()
            .filter(parking_spot::Column::IsOccupied.eq(false))
            .filter(parking_spot::Column::IsReserved.eq(false))
            .order_by_asc(parking_spot::Column::Code)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::new(StatusCode::CONFLICT, "No free spots available"))?,
    };

    let now = Utc::now();
    let record = check_in::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        ticket_number: Set(generate_ticket_number()),
        vehicle_id: Set(vehicle.id.clone()),
        spot_id: Set(Some(spot.id.clone())),
        operator_id: Set(Some(caller.id.clone())),
        entry_time: Set(now),
        expected_exit_time: Set(payload.expected_exit_time),
        created_at: Set(now),
    };
    let created = record.insert(&state.db).await?;

    let mut spot_active: parking_spot::ActiveModel = spot.clone().into();
    spot_active.is_occupied = Set(true);
    spot_active.vehicle_id = Set(Some(vehicle.id.clone()));
    spot_active.update(&state.db).await?;

    let mut vehicle_active: vehicle::ActiveModel = vehicle.clone().into();
    vehicle_active.status = Set(VehicleStatus::Parked);
    vehicle_active.spot_id = Set(Some(spot.id.clone()));
    vehicle_active.updated_at = Set(now);
    vehicle_active.update(&state.db).await?;

    metrics::counter!("parking_check_ins_total").increment(1);
    info!(ticket = %created.ticket_number, plate = %vehicle.plate, spot = %spot.code, "vehicle checked in");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CheckInResponse {
            id: created.id,
            ticket_number: created.ticket_number,
            vehicle_id: vehicle.id,
            plate: vehicle.plate,
            spot_code: spot.code,
            entry_time: created.entry_time,
            expected_exit_time: created.expected_exit_time,
        })),
    ))
}

/// Check a vehicle out: compute the fee and free the spot
#[utoipa::path(
    post,
    path = "/api/v1/parking/check-out",
    tag = "parking",
    request_body = CheckOutRequest,
    responses(
        (status = 201, description = "Receipt", body = ApiResponse<CheckOutResponse>),
        (status = 404, description = "No open stay for the given ticket or plate"),
        (status = 409, description = "Ticket already settled"),
        (status = 422, description = "Unknown tariff profile or invalid interval")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_out(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<CheckOutRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CheckOutResponse>>)> {
    let payment_method = match payload.payment_method.as_deref() {
        Some(s) => Some(PaymentMethod::parse(s).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown payment method: {s}"),
            )
        })?),
        None => None,
    };

    let open_check_in = match (&payload.ticket_number, &payload.plate) {
        (Some(ticket), _) => check_in::Entity::find()
            .filter(check_in::Column::TicketNumber.eq(ticket))
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                ApiError::from(DomainError::NotFound {
                    entity: "ticket",
                    id: ticket.clone(),
                })
            })?,
        (None, Some(_)) => {
            let vehicle = resolve_vehicle(&state, None, payload.plate.as_deref()).await?;
            check_in::Entity::find()
                .filter(check_in::Column::VehicleId.eq(&vehicle.id))
                .order_by_desc(check_in::Column::EntryTime)
                .one(&state.db)
                .await?
                .ok_or_else(|| {
                    ApiError::from(DomainError::NotFound {
                        entity: "check-in for vehicle",
                        id: vehicle.plate.clone(),
                    })
                })?
        }
        (None, None) => {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "Either ticket_number or plate is required",
            ))
        }
    };

    let already_settled = check_out::Entity::find()
        .filter(check_out::Column::CheckInId.eq(&open_check_in.id))
        .one(&state.db)
        .await?;
    if already_settled.is_some() {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("Ticket {} is already settled", open_check_in.ticket_number),
        ));
    }

    let vehicle = vehicle::Entity::find_by_id(&open_check_in.vehicle_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::from(DomainError::NotFound {
                entity: "vehicle",
                id: open_check_in.vehicle_id.clone(),
            })
        })?;

    let exit_time = Utc::now();
    let interval = StayInterval::new(open_check_in.entry_time, exit_time)
        .map_err(ApiError::from)?;
    let total_amount = state
        .billing
        .fee_for_stay(&vehicle.tariff_key, &interval)
        .await?;
    let total_minutes = interval.elapsed_minutes();

    let status = if payment_method.is_some() {
        SettlementStatus::Processing
    } else {
        SettlementStatus::Pending
    };
    let record = check_out::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        check_in_id: Set(open_check_in.id.clone()),
        vehicle_id: Set(vehicle.id.clone()),
        operator_id: Set(Some(caller.id.clone())),
        exit_time: Set(exit_time),
        total_minutes: Set(total_minutes),
        total_amount: Set(total_amount),
        tariff_key: Set(vehicle.tariff_key.clone()),
        payment_method: Set(payment_method.clone()),
        payment_status: Set(status.clone()),
        created_at: Set(exit_time),
    };
    let created = record.insert(&state.db).await?;

    if let Some(spot_id) = &open_check_in.spot_id {
        if let Some(spot) = parking_spot::Entity::find_by_id(spot_id).one(&state.db).await? {
            let mut spot_active: parking_spot::ActiveModel = spot.into();
            spot_active.is_occupied = Set(false);
            spot_active.vehicle_id = Set(None);
            spot_active.update(&state.db).await?;
        }
    }

    let mut vehicle_active: vehicle::ActiveModel = vehicle.clone().into();
    vehicle_active.status = Set(VehicleStatus::Delivered);
    vehicle_active.spot_id = Set(None);
    vehicle_active.updated_at = Set(exit_time);
    vehicle_active.update(&state.db).await?;

    metrics::counter!("parking_check_outs_total").increment(1);
    metrics::histogram!("parking_fee_centavos").record(total_amount as f64);
    info!(
        ticket = %open_check_in.ticket_number,
        plate = %vehicle.plate,
        minutes = total_minutes,
        amount = total_amount,
        "vehicle checked out"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CheckOutResponse {
            id: created.id,
            ticket_number: open_check_in.ticket_number,
            plate: vehicle.plate,
            entry_time: open_check_in.entry_time,
            exit_time,
            total_minutes,
            total_amount,
            total_amount_formatted: format_amount(total_amount),
            tariff_key: created.tariff_key,
            payment_method: created.payment_method.map(|m| m.as_str().to_string()),
            payment_status: created.payment_status.as_str().to_string(),
        })),
    ))
}

/// Flag a parked vehicle for exit so the valet can fetch it
#[utoipa::path(
    post,
    path = "/api/v1/parking/request-exit",
    tag = "parking",
    request_body = RequestExitRequest,
    responses(
        (status = 200, description = "Exit requested", body = ApiResponse<VehicleResponse>),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Vehicle is not parked")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_exit(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<RequestExitRequest>,
) -> ApiResult<Json<ApiResponse<VehicleResponse>>> {
    let vehicle = resolve_vehicle(
        &state,
        payload.vehicle_id.as_deref(),
        payload.plate.as_deref(),
    )
    .await?;

    if vehicle.status != VehicleStatus::Parked {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("Vehicle {} is not parked", vehicle.plate),
        ));
    }

    let plate = vehicle.plate.clone();
    let mut active: vehicle::ActiveModel = vehicle.into();
    active.status = Set(VehicleStatus::ExitRequested);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    info!(plate = %plate, "exit requested");
    Ok(Json(ApiResponse::ok(VehicleResponse::from(updated))))
}

/// Stays currently open, with elapsed time
#[utoipa::path(
    get,
    path = "/api/v1/parking/active",
    tag = "parking",
    responses(
        (status = 200, description = "Open stays", body = ApiResponse<Vec<ActiveStayResponse>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn active_stays(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<Vec<ActiveStayResponse>>>> {
    let parked = vehicle::Entity::find()
        .filter(vehicle::Column::Status.is_in([VehicleStatus::Parked, VehicleStatus::ExitRequested]))
        .all(&state.db)
        .await?;

    let now = Utc::now();
    let mut stays = Vec::with_capacity(parked.len());
    for v in parked {
        let Some(ci) = check_in::Entity::find()
            .filter(check_in::Column::VehicleId.eq(&v.id))
            .order_by_desc(check_in::Column::EntryTime)
            .one(&state.db)
            .await?
        else {
            continue;
        };

        let spot_code = match &ci.spot_id {
            Some(spot_id) => parking_spot::Entity::find_by_id(spot_id)
                .one(&state.db)
                .await?
                .map(|s| s.code),
            None => None,
        };

        stays.push(ActiveStayResponse {
            ticket_number: ci.ticket_number,
            vehicle_id: v.id,
            plate: v.plate,
            spot_code,
            entry_time: ci.entry_time,
            elapsed_minutes: (now - ci.entry_time).num_minutes(),
            tariff_key: v.tariff_key,
        });
    }

    Ok(Json(ApiResponse::ok(stays)))
}

/// Paginated check-in history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/parking/check-ins",
    tag = "parking",
    params(PaginationParams),
    responses(
        (status = 200, description = "Check-in history", body = ApiResponse<PaginatedResponse<CheckInHistoryItem>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_in_history(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<CheckInHistoryItem>>>> {
    let paginator = check_in::Entity::find()
        .order_by_desc(check_in::Column::EntryTime)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let items: Vec<CheckInHistoryItem> = paginator
        .fetch_page(pagination.page_index())
        .await?
        .into_iter()
        .map(|ci| CheckInHistoryItem {
            id: ci.id,
            ticket_number: ci.ticket_number,
            vehicle_id: ci.vehicle_id,
            spot_id: ci.spot_id,
            entry_time: ci.entry_time,
            expected_exit_time: ci.expected_exit_time,
        })
        .collect();

    Ok(Json(ApiResponse::ok(PaginatedResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// Paginated check-out history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/parking/check-outs",
    tag = "parking",
    params(PaginationParams),
    responses(
        (status = 200, description = "Check-out history", body = ApiResponse<PaginatedResponse<CheckOutHistoryItem>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_out_history(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<CheckOutHistoryItem>>>> {
    let paginator = check_out::Entity::find()
        .order_by_desc(check_out::Column::ExitTime)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let items: Vec<CheckOutHistoryItem> = paginator
        .fetch_page(pagination.page_index())
        .await?
        .into_iter()
        .map(|co| CheckOutHistoryItem {
            id: co.id,
            check_in_id: co.check_in_id,
            vehicle_id: co.vehicle_id,
            exit_time: co.exit_time,
            total_minutes: co.total_minutes,
            total_amount: co.total_amount,
            tariff_key: co.tariff_key,
            payment_method: co.payment_method.map(|m| m.as_str().to_string()),
            payment_status: co.payment_status.as_str().to_string(),
        })
        .collect();

    Ok(Json(ApiResponse::ok(PaginatedResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_numbers_have_expected_shape() {
        let ticket = generate_ticket_number();
        let parts: Vec<&str> = ticket.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TKT");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 5);
        assert!(parts[2]
            .chars()
            .all(|c| TICKET_CHARSET.contains(&(c as u8))));
    }

    #[test]
    fn ticket_numbers_are_distinct() {
        let a = generate_ticket_number();
        let b = generate_ticket_number();
        assert_ne!(a, b);
    }
}
