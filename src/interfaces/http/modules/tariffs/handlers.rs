use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use super::dto::{
    CreateTariffRequest, PreviewRequest, PreviewResponse, TariffResponse, UpdateTariffRequest,
};
use crate::application::services::billing::rule_to_profile;
use crate::domain::{format_amount, DomainError};
use crate::infrastructure::database::entities::pricing_rule::{self, BillingModeKind};
use crate::infrastructure::database::entities::user::UserRole;
use crate::interfaces::http::common::{
    validated_json::ValidatedJson, ApiError, ApiResponse, ApiResult,
};
use crate::interfaces::http::middleware::{require_role, AuthenticatedUser};
use crate::interfaces::http::AppState;

fn parse_mode(s: &str) -> Result<BillingModeKind, ApiError> {
    BillingModeKind::parse(s).ok_or_else(|| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Unknown billing mode: {s}"),
        )
    })
}

async fn find_rule(state: &AppState, key: &str) -> Result<pricing_rule::Model, ApiError> {
    pricing_rule::Entity::find()
        .filter(pricing_rule::Column::Key.eq(key))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::from(DomainError::UnknownProfile(key.to_string())))
}

/// List all pricing rules, active and inactive
#[utoipa::path(
    get,
    path = "/api/v1/tariffs",
    tag = "tariffs",
    responses(
        (status = 200, description = "Pricing rules", body = ApiResponse<Vec<TariffResponse>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_tariffs(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<Vec<TariffResponse>>>> {
    let rules: Vec<TariffResponse> = pricing_rule::Entity::find()
        .order_by_asc(pricing_rule::Column::Key)
        .all(&state.db)
        .await?
        .into_iter()
        .map(TariffResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok(rules)))
}

/// Fetch one pricing rule by key
#[utoipa::path(
    get,
    path = "/api/v1/tariffs/{key}",
    tag = "tariffs",
    params(("key" = String, Path, description = "Tariff key, case-sensitive")),
    responses(
        (status = 200, description = "Pricing rule", body = ApiResponse<TariffResponse>),
        (status = 422, description = "Unknown tariff profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_tariff(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Path(key): Path<String>,
) -> ApiResult<Json<ApiResponse<TariffResponse>>> {
    let rule = find_rule(&state, &key).await?;
    Ok(Json(ApiResponse::ok(TariffResponse::from(rule))))
}

/// Create a pricing rule. Admin and manager only.
#[utoipa::path(
    post,
    path = "/api/v1/tariffs",
    tag = "tariffs",
    request_body = CreateTariffRequest,
    responses(
        (status = 201, description = "Rule created", body = ApiResponse<TariffResponse>),
        (status = 409, description = "Key already exists"),
        (status = 422, description = "Incomplete amounts for the billing mode")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tariff(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<CreateTariffRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TariffResponse>>)> {
    require_role(&caller, &[UserRole::Manager])?;

    let mode = parse_mode(&payload.billing_mode)?;

    let existing = pricing_rule::Entity::find()
        .filter(pricing_rule::Column::Key.eq(&payload.key))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("Tariff key {} already exists", payload.key),
        ));
    }

    let now = Utc::now();
    let candidate = pricing_rule::Model {
        id: 0,
        key: payload.key.clone(),
        display_name: payload.display_name.clone(),
        billing_mode: mode.clone(),
        first_20_min_amount: payload.first_20_min_amount,
        first_hour_amount: payload.first_hour_amount,
        additional_hour_amount: payload.additional_hour_amount,
        fixed_amount: payload.fixed_amount,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    // Reject incomplete or negative amounts before they reach the table.
    rule_to_profile(&candidate)?;

    let record = pricing_rule::ActiveModel {
        key: Set(candidate.key),
        display_name: Set(candidate.display_name),
        billing_mode: Set(candidate.billing_mode),
        first_20_min_amount: Set(candidate.first_20_min_amount),
        first_hour_amount: Set(candidate.first_hour_amount),
        additional_hour_amount: Set(candidate.additional_hour_amount),
        fixed_amount: Set(candidate.fixed_amount),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = record.insert(&state.db).await?;

    state.billing.reload().await?;
    info!(key = %created.key, "tariff created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TariffResponse::from(created))),
    ))
}

/// Update a pricing rule. Admin and manager only.
#[utoipa::path(
    put,
    path = "/api/v1/tariffs/{key}",
    tag = "tariffs",
    params(("key" = String, Path, description = "Tariff key, case-sensitive")),
    request_body = UpdateTariffRequest,
    responses(
        (status = 200, description = "Rule updated", body = ApiResponse<TariffResponse>),
        (status = 422, description = "Unknown profile or incomplete amounts")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_tariff(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(key): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateTariffRequest>,
) -> ApiResult<Json<ApiResponse<TariffResponse>>> {
    require_role(&caller, &[UserRole::Manager])?;

    let rule = find_rule(&state, &key).await?;
    let mut candidate = rule.clone();

    if let Some(display_name) = payload.display_name {
        candidate.display_name = display_name;
    }
    if let Some(mode_str) = payload.billing_mode {
        candidate.billing_mode = parse_mode(&mode_str)?;
    }
    if let Some(v) = payload.first_20_min_amount {
        candidate.first_20_min_amount = Some(v);
    }
    if let Some(v) = payload.first_hour_amount {
        candidate.first_hour_amount = Some(v);
    }
    if let Some(v) = payload.additional_hour_amount {
        candidate.additional_hour_amount = Some(v);
    }
    if let Some(v) = payload.fixed_amount {
        candidate.fixed_amount = Some(v);
    }
    if let Some(v) = payload.is_active {
        candidate.is_active = v;
    }
    candidate.updated_at = Utc::now();

    // An inactive rule may be left incomplete; an active one must price.
    if candidate.is_active {
        rule_to_profile(&candidate)?;
    }

    let mut active: pricing_rule::ActiveModel = rule.into();
    active.display_name = Set(candidate.display_name.clone());
    active.billing_mode = Set(candidate.billing_mode.clone());
    active.first_20_min_amount = Set(candidate.first_20_min_amount);
    active.first_hour_amount = Set(candidate.first_hour_amount);
    active.additional_hour_amount = Set(candidate.additional_hour_amount);
    active.fixed_amount = Set(candidate.fixed_amount);
    active.is_active = Set(candidate.is_active);
    active.updated_at = Set(candidate.updated_at);
    let updated = active.update(&state.db).await?;

    state.billing.reload().await?;
    info!(key = %updated.key, "tariff updated");
    Ok(Json(ApiResponse::ok(TariffResponse::from(updated))))
}

/// Deactivate a pricing rule. Admin and manager only; soft delete.
#[utoipa::path(
    delete,
    path = "/api/v1/tariffs/{key}",
    tag = "tariffs",
    params(("key" = String, Path, description = "Tariff key, case-sensitive")),
    responses(
        (status = 200, description = "Rule deactivated", body = ApiResponse<TariffResponse>),
        (status = 422, description = "Unknown tariff profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_tariff(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(key): Path<String>,
) -> ApiResult<Json<ApiResponse<TariffResponse>>> {
    require_role(&caller, &[UserRole::Manager])?;

    let rule = find_rule(&state, &key).await?;
    let mut active: pricing_rule::ActiveModel = rule.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    state.billing.reload().await?;
    info!(key = %updated.key, "tariff deactivated");
    Ok(Json(ApiResponse::ok(TariffResponse::from(updated))))
}

/// Dry-run the fee calculator for a duration
#[utoipa::path(
    post,
    path = "/api/v1/tariffs/preview",
    tag = "tariffs",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Computed fee", body = ApiResponse<PreviewResponse>),
        (status = 422, description = "Unknown profile or negative duration")
    ),
    security(("bearer_auth" = []))
)]
pub async fn preview_fee(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<PreviewRequest>,
) -> ApiResult<Json<ApiResponse<PreviewResponse>>> {
    let amount = state
        .billing
        .preview_fee(&payload.tariff_key, payload.elapsed_minutes)
        .await?;

    Ok(Json(ApiResponse::ok(PreviewResponse {
        tariff_key: payload.tariff_key,
        elapsed_minutes: payload.elapsed_minutes,
        amount,
        amount_formatted: format_amount(amount),
    })))
}
