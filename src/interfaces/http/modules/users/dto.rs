use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserFilter {
    /// Filter by role: admin, manager, valet, receptionist
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 120, message = "must be 2-120 characters"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    /// One of: admin, manager, valet, receptionist
    pub role: Option<String>,
    pub is_active: Option<bool>,
}
