//! Shared HTTP plumbing: response envelope, pagination, error mapping

pub mod validated_json;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::DomainError;

/// Standard response envelope for all endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Paginated list payload
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Query parameters for paginated listings
#[derive(Debug, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Page number, 1-based
    pub page: Option<u64>,
    /// Items per page (max 100)
    pub limit: Option<u64>,
}

impl PaginationParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(50).clamp(1, 100)
    }

    /// Zero-based page index for the paginator
    pub fn page_index(&self) -> u64 {
        self.page() - 1
    }
}

/// HTTP error carrying a status and an envelope body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.message);
        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::UnknownProfile(_) | DomainError::InvalidInterval(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {}", err);
            return ApiError::new(status, "Internal server error");
        }
        ApiError::new(status, err.to_string())
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        ApiError::from(DomainError::from(err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let params = PaginationParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 50);
        assert_eq!(params.page_index(), 0);
    }

    #[test]
    fn pagination_clamps_limit() {
        let params = PaginationParams {
            page: Some(0),
            limit: Some(500),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 100);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 101, 1, 50);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        let err = ApiError::from(DomainError::UnknownProfile("x".into()));
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(DomainError::NotFound {
            entity: "vehicle",
            id: "1".into(),
        });
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = ApiError::from(DomainError::Conflict("plate".into()));
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::from(DomainError::Database("secret dsn".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("secret"));
    }
}
