//! Request middleware: bearer-token authentication and request metrics

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use super::common::ApiError;
use super::AppState;
use crate::infrastructure::crypto::jwt::verify_token;
use crate::infrastructure::database::entities::user::UserRole;

/// Identity attached to the request after token verification
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Admins implicitly hold every role.
    pub fn has_role(&self, allowed: &[UserRole]) -> bool {
        self.role == UserRole::Admin || allowed.contains(&self.role)
    }
}

/// Check the caller holds one of `allowed`, otherwise 403.
pub fn require_role(user: &AuthenticatedUser, allowed: &[UserRole]) -> Result<(), ApiError> {
    if user.has_role(allowed) {
        Ok(())
    } else {
        Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "Insufficient permissions",
        ))
    }
}

/// Verifies the `Authorization: Bearer` token and stores the caller's
/// identity as a request extension.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            ApiError::new(StatusCode::UNAUTHORIZED, "Missing authentication token")
        })?;

    let claims = verify_token(token, &state.jwt)
        .map_err(|_| ApiError::new(StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

    let role = UserRole::parse(&claims.role)
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: claims.sub,
        email: claims.email,
        role,
    });

    Ok(next.run(request).await)
}

/// Records a counter and a latency histogram for every request, labelled
/// by method, matched route and status.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<axum::extract::MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let start = Instant::now();
    let response = next.run(request).await;
    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method.to_string()),
        ("path", path),
        ("status", status),
    ];
    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels).record(latency);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_passes_every_role_check() {
        let user = AuthenticatedUser {
            id: "u1".into(),
            email: "a@b.com".into(),
            role: UserRole::Admin,
        };
        assert!(user.has_role(&[UserRole::Manager]));
        assert!(user.has_role(&[]));
    }

    #[test]
    fn valet_cannot_act_as_manager() {
        let user = AuthenticatedUser {
            id: "u2".into(),
            email: "v@b.com".into(),
            role: UserRole::Valet,
        };
        assert!(!user.has_role(&[UserRole::Manager]));
        assert!(user.has_role(&[UserRole::Valet, UserRole::Receptionist]));
        assert!(require_role(&user, &[UserRole::Manager]).is_err());
    }
}
