use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use super::dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleFilter, VehicleResponse};
use crate::domain::DomainError;
use crate::infrastructure::database::entities::vehicle::{self, VehicleStatus, VehicleType};
use crate::interfaces::http::common::{
    validated_json::ValidatedJson, ApiError, ApiResponse, ApiResult, PaginatedResponse,
    PaginationParams,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::AppState;

fn parse_vehicle_type(s: &str) -> Result<VehicleType, ApiError> {
    VehicleType::parse(s).ok_or_else(|| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Unknown vehicle type: {s}"),
        )
    })
}

async fn find_vehicle(state: &AppState, id: &str) -> Result<vehicle::Model, ApiError> {
    vehicle::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::from(DomainError::NotFound {
                entity: "vehicle",
                id: id.to_string(),
            })
        })
}

/// Register a vehicle
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = ApiResponse<VehicleResponse>),
        (status = 409, description = "Plate already registered"),
        (status = 422, description = "Validation failed or unknown tariff profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<VehicleResponse>>)> {
    let plate = payload.plate.trim().to_uppercase();

    let vehicle_type = match payload.vehicle_type.as_deref() {
        Some(s) => parse_vehicle_type(s)?,
        None => VehicleType::default(),
    };

    // Tariff keys are validated against the registry on write, so a typo
    // surfaces here instead of at the customer's check-out.
    let tariff_key = payload.tariff_key.unwrap_or_else(|| "avulso".to_string());
    state.billing.resolve_profile(&tariff_key).await?;

    let existing = vehicle::Entity::find()
        .filter(vehicle::Column::Plate.eq(&plate))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("Plate {plate} is already registered"),
        ));
    }

    let now = Utc::now();
    let model = vehicle::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        plate: Set(plate),
        model: Set(payload.model),
        brand: Set(payload.brand),
        color: Set(payload.color),
        vehicle_type: Set(vehicle_type),
        owner_name: Set(payload.owner_name),
        owner_phone: Set(payload.owner_phone),
        tariff_key: Set(tariff_key),
        status: Set(VehicleStatus::Reserved),
        spot_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = model.insert(&state.db).await?;

    info!(plate = %created.plate, "vehicle registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(VehicleResponse::from(created))),
    ))
}

/// List vehicles with optional status and plate filters
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "vehicles",
    params(PaginationParams, VehicleFilter),
    responses(
        (status = 200, description = "Paginated vehicles", body = ApiResponse<PaginatedResponse<VehicleResponse>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<VehicleFilter>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<VehicleResponse>>>> {
    let mut query = vehicle::Entity::find();

    if let Some(status_str) = &filter.status {
        let status = VehicleStatus::parse(status_str).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown status: {status_str}"),
            )
        })?;
        query = query.filter(vehicle::Column::Status.eq(status));
    }
    if let Some(plate) = &filter.plate {
        query = query.filter(vehicle::Column::Plate.contains(plate.to_uppercase()));
    }

    let paginator = query
        .order_by_desc(vehicle::Column::CreatedAt)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let items: Vec<VehicleResponse> = paginator
        .fetch_page(pagination.page_index())
        .await?
        .into_iter()
        .map(VehicleResponse::from)
        .collect();

    Ok(Json(ApiResponse::ok(PaginatedResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// Fetch one vehicle
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "vehicles",
    params(("id" = String, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Vehicle", body = ApiResponse<VehicleResponse>),
        (status = 404, description = "Vehicle not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<VehicleResponse>>> {
    let found = find_vehicle(&state, &id).await?;
    Ok(Json(ApiResponse::ok(VehicleResponse::from(found))))
}

/// Update a vehicle's details
#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    tag = "vehicles",
    params(("id" = String, Path, description = "Vehicle id")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Updated vehicle", body = ApiResponse<VehicleResponse>),
        (status = 404, description = "Vehicle not found"),
        (status = 422, description = "Unknown tariff profile or vehicle type")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateVehicleRequest>,
) -> ApiResult<Json<ApiResponse<VehicleResponse>>> {
    let found = find_vehicle(&state, &id).await?;
    let mut active: vehicle::ActiveModel = found.into();

    if let Some(model) = payload.model {
        active.model = Set(model);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(Some(brand));
    }
    if let Some(color) = payload.color {
        active.color = Set(Some(color));
    }
    if let Some(type_str) = payload.vehicle_type {
        active.vehicle_type = Set(parse_vehicle_type(&type_str)?);
    }
    if let Some(owner_name) = payload.owner_name {
        active.owner_name = Set(Some(owner_name));
    }
    if let Some(owner_phone) = payload.owner_phone {
        active.owner_phone = Set(Some(owner_phone));
    }
    if let Some(tariff_key) = payload.tariff_key {
        state.billing.resolve_profile(&tariff_key).await?;
        active.tariff_key = Set(tariff_key);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;
    Ok(Json(ApiResponse::ok(VehicleResponse::from(updated))))
}

/// Remove a vehicle. Rejected while the vehicle is on the premises.
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "vehicles",
    params(("id" = String, Path, description = "Vehicle id")),
    responses(
        (status = 204, description = "Vehicle removed"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Vehicle is currently parked")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let found = find_vehicle(&state, &id).await?;
    if found.status.is_on_premises() {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "Vehicle is currently parked; check it out first",
        ));
    }

    let plate = found.plate.clone();
    found.delete(&state.db).await?;
    info!(plate = %plate, "vehicle removed");
    Ok(StatusCode::NO_CONTENT)
}
