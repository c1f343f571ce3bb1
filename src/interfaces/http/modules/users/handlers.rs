use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use super::dto::{UpdateUserRequest, UserFilter};
use crate::domain::DomainError;
use crate::infrastructure::database::entities::user::{self, UserRole};
use crate::interfaces::http::common::{
    validated_json::ValidatedJson, ApiError, ApiResponse, ApiResult, PaginatedResponse,
    PaginationParams,
};
use crate::interfaces::http::middleware::{require_role, AuthenticatedUser};
use crate::interfaces::http::modules::auth::dto::UserResponse;
use crate::interfaces::http::AppState;

async fn find_user(state: &AppState, id: &str) -> Result<user::Model, ApiError> {
    user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::from(DomainError::NotFound {
                entity: "user",
                id: id.to_string(),
            })
        })
}

/// List staff members. Admin and manager only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(PaginationParams, UserFilter),
    responses(
        (status = 200, description = "Paginated users", body = ApiResponse<PaginatedResponse<UserResponse>>),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<UserFilter>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<UserResponse>>>> {
    require_role(&caller, &[UserRole::Manager])?;

    let mut query = user::Entity::find();
    if let Some(role_str) = &filter.role {
        let role = UserRole::parse(role_str).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown role: {role_str}"),
            )
        })?;
        query = query.filter(user::Column::Role.eq(role));
    }
    if let Some(is_active) = filter.is_active {
        query = query.filter(user::Column::IsActive.eq(is_active));
    }

    let paginator = query
        .order_by_asc(user::Column::Name)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let items: Vec<UserResponse> = paginator
        .fetch_page(pagination.page_index())
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(ApiResponse::ok(PaginatedResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// Fetch one staff member
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    // Staff can read their own record; management can read anyone's.
    if caller.id != id {
        require_role(&caller, &[UserRole::Manager])?;
    }
    let found = find_user(&state, &id).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(found))))
}

/// Update a staff member. Role changes require admin.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    require_role(&caller, &[UserRole::Manager])?;
    if payload.role.is_some() || payload.is_active.is_some() {
        require_role(&caller, &[UserRole::Admin])?;
    }

    let found = find_user(&state, &id).await?;
    let mut active: user::ActiveModel = found.into();

    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(role_str) = payload.role {
        let role = UserRole::parse(&role_str).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown role: {role_str}"),
            )
        })?;
        active.role = Set(role);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;
    info!(user_id = %updated.id, "user updated");
    Ok(Json(ApiResponse::ok(UserResponse::from(updated))))
}

/// Deactivate a staff member. Admin only; soft delete.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deactivated", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found"),
        (status = 409, description = "Cannot deactivate yourself")
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    require_role(&caller, &[UserRole::Admin])?;
    if caller.id == id {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "Cannot deactivate your own account",
        ));
    }

    let found = find_user(&state, &id).await?;
    let mut active: user::ActiveModel = found.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    info!(user_id = %updated.id, "user deactivated");
    Ok(Json(ApiResponse::ok(UserResponse::from(updated))))
}
