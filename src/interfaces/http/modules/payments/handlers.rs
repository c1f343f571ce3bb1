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
use uuid::Uuid;

use super::dto::{CreatePaymentRequest, PaymentFilter, PaymentResponse};
use crate::domain::DomainError;
use crate::infrastructure::database::entities::{
    check_out::{self, SettlementStatus},
    payment::{self, PaymentMethod, PaymentStatus},
};
use crate::interfaces::http::common::{
    validated_json::ValidatedJson, ApiError, ApiResponse, ApiResult, PaginatedResponse,
    PaginationParams,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::AppState;

async fn find_payment(state: &AppState, id: &str) -> Result<payment::Model, ApiError> {
    payment::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::from(DomainError::NotFound {
                entity: "payment",
                id: id.to_string(),
            })
        })
}

/// Open a payment for a check-out receipt
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment created", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Check-out not found"),
        (status = 409, description = "Check-out already paid"),
        (status = 422, description = "Unknown payment method")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    ValidatedJson(payload): ValidatedJson<CreatePaymentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PaymentResponse>>)> {
    let method = PaymentMethod::parse(&payload.method).ok_or_else(|| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Unknown payment method: {}", payload.method),
        )
    })?;

    let receipt = check_out::Entity::find_by_id(&payload.check_out_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            ApiError::from(DomainError::NotFound {
                entity: "check-out",
                id: payload.check_out_id.clone(),
            })
        })?;
    if receipt.payment_status == SettlementStatus::Paid {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "Check-out is already paid",
        ));
    }

    let now = Utc::now();
    let record = payment::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        check_out_id: Set(receipt.id.clone()),
        amount: Set(receipt.total_amount),
        method: Set(method.clone()),
        status: Set(PaymentStatus::Pending),
        paid_at: Set(None),
        created_at: Set(now),
    };
    let created = record.insert(&state.db).await?;

    let mut receipt_active: check_out::ActiveModel = receipt.into();
    receipt_active.payment_status = Set(SettlementStatus::Processing);
    receipt_active.payment_method = Set(Some(method));
    receipt_active.update(&state.db).await?;

    info!(payment_id = %created.id, amount = created.amount, "payment opened");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(PaymentResponse::from(created))),
    ))
}

/// List payments, optionally by status
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "payments",
    params(PaginationParams, PaymentFilter),
    responses(
        (status = 200, description = "Paginated payments", body = ApiResponse<PaginatedResponse<PaymentResponse>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_payments(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<PaymentFilter>,
) -> ApiResult<Json<ApiResponse<PaginatedResponse<PaymentResponse>>>> {
    let mut query = payment::Entity::find();
    if let Some(status_str) = &filter.status {
        let status = PaymentStatus::parse(status_str).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown status: {status_str}"),
            )
        })?;
        query = query.filter(payment::Column::Status.eq(status));
    }
    if let Some(method_str) = &filter.method {
        let method = PaymentMethod::parse(method_str).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown payment method: {method_str}"),
            )
        })?;
        query = query.filter(payment::Column::Method.eq(method));
    }

    let paginator = query
        .order_by_desc(payment::Column::CreatedAt)
        .paginate(&state.db, pagination.limit());
    let total = paginator.num_items().await?;
    let items: Vec<PaymentResponse> = paginator
        .fetch_page(pagination.page_index())
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    Ok(Json(ApiResponse::ok(PaginatedResponse::new(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))))
}

/// Fetch one payment
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "payments",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Payment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_payment(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PaymentResponse>>> {
    let found = find_payment(&state, &id).await?;
    Ok(Json(ApiResponse::ok(PaymentResponse::from(found))))
}

/// Approve a pending payment and mark the check-out paid
#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/process",
    tag = "payments",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment approved", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment is not pending")
    ),
    security(("bearer_auth" = []))
)]
pub async fn process_payment(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PaymentResponse>>> {
    let found = find_payment(&state, &id).await?;
    if !matches!(
        found.status,
        PaymentStatus::Pending | PaymentStatus::Processing
    ) {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            format!("Payment is {}", found.status.as_str()),
        ));
    }

    let check_out_id = found.check_out_id.clone();
    let mut active: payment::ActiveModel = found.into();
    active.status = Set(PaymentStatus::Approved);
    active.paid_at = Set(Some(Utc::now()));
    let updated = active.update(&state.db).await?;

    if let Some(receipt) = check_out::Entity::find_by_id(&check_out_id)
        .one(&state.db)
        .await?
    {
        let mut receipt_active: check_out::ActiveModel = receipt.into();
        receipt_active.payment_status = Set(SettlementStatus::Paid);
        receipt_active.update(&state.db).await?;
    }

    metrics::counter!("payments_approved_total").increment(1);
    info!(payment_id = %updated.id, amount = updated.amount, "payment approved");
    Ok(Json(ApiResponse::ok(PaymentResponse::from(updated))))
}

/// Cancel a payment that has not been approved
#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/cancel",
    tag = "payments",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment cancelled", body = ApiResponse<PaymentResponse>),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment already approved")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_payment(
    State(state): State<AppState>,
    Extension(_caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PaymentResponse>>> {
    let found = find_payment(&state, &id).await?;
    if found.status == PaymentStatus::Approved {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "Approved payments cannot be cancelled",
        ));
    }

    let check_out_id = found.check_out_id.clone();
    let mut active: payment::ActiveModel = found.into();
    active.status = Set(PaymentStatus::Cancelled);
    let updated = active.update(&state.db).await?;

    // Reopen the receipt so another payment attempt can be made.
    if let Some(receipt) = check_out::Entity::find_by_id(&check_out_id)
        .one(&state.db)
        .await?
    {
        if receipt.payment_status != SettlementStatus::Paid {
            let mut receipt_active: check_out::ActiveModel = receipt.into();
            receipt_active.payment_status = Set(SettlementStatus::Pending);
            receipt_active.update(&state.db).await?;
        }
    }

    info!(payment_id = %updated.id, "payment cancelled");
    Ok(Json(ApiResponse::ok(PaymentResponse::from(updated))))
}
