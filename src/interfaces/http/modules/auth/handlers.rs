use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

use super::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, UserResponse,
};
use crate::infrastructure::crypto::jwt::create_token;
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::database::entities::user::{self, UserRole};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, validated_json::ValidatedJson};
use crate::interfaces::http::middleware::{require_role, AuthenticatedUser};
use crate::interfaces::http::AppState;

/// Register a new staff member. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    require_role(&caller, &[UserRole::Admin])?;

    let role = match payload.role.as_deref() {
        Some(s) => UserRole::parse(s).ok_or_else(|| {
            ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, format!("Unknown role: {s}"))
        })?,
        None => UserRole::default(),
    };

    let email = payload.email.to_lowercase();
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "Email already registered",
        ));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))?;

    let now = Utc::now();
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        email: Set(email),
        name: Set(payload.name),
        phone: Set(payload.phone),
        password_hash: Set(password_hash),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        last_login_at: Set(None),
    };
    let created = model.insert(&state.db).await?;

    info!(email = %created.email, role = created.role.as_str(), "user registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse::from(created))),
    ))
}

/// Exchange credentials for a JWT
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let invalid = || ApiError::new(StatusCode::UNAUTHORIZED, "Invalid email or password");

    let found = user::Entity::find()
        .filter(user::Column::Email.eq(payload.email.to_lowercase()))
        .filter(user::Column::IsActive.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(invalid)?;

    let valid = verify_password(&payload.password, &found.password_hash)
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))?;
    if !valid {
        return Err(invalid());
    }

    let token = create_token(&found.id, &found.email, found.role.as_str(), &state.jwt)
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))?;

    let mut active: user::ActiveModel = found.clone().into();
    active.last_login_at = Set(Some(Utc::now()));
    let updated = active.update(&state.db).await?;

    info!(email = %updated.email, "user logged in");
    Ok(Json(ApiResponse::ok(AuthResponse {
        token,
        user: UserResponse::from(updated),
    })))
}

/// Change the caller's own password
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "auth",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<UserResponse>),
        (status = 401, description = "Current password is wrong")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let found = user::Entity::find_by_id(&caller.id)
        .one(&state.db)
        .await?
        .ok_or(crate::domain::DomainError::NotFound {
            entity: "user",
            id: caller.id.clone(),
        })?;

    let valid = verify_password(&payload.current_password, &found.password_hash)
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))?;
    if !valid {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "Current password is wrong",
        ));
    }

    let password_hash = hash_password(&payload.new_password)
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))?;

    let mut active: user::ActiveModel = found.into();
    active.password_hash = Set(password_hash);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    info!(email = %updated.email, "password changed");
    Ok(Json(ApiResponse::ok(UserResponse::from(updated))))
}

/// Current authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Json<ApiResponse<UserResponse>>> {
    let found = user::Entity::find_by_id(&caller.id)
        .one(&state.db)
        .await?
        .ok_or(crate::domain::DomainError::NotFound {
            entity: "user",
            id: caller.id.clone(),
        })?;

    Ok(Json(ApiResponse::ok(UserResponse::from(found))))
}
