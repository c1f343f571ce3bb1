pub mod dto;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::interfaces::http::{middleware::auth_middleware, AppState};

/// Routes that require a valid token
pub fn protected_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/me", get(handlers::me))
        .route("/change-password", post(handlers::change_password))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Routes reachable without a token
pub fn public_router() -> Router<AppState> {
    Router::new().route("/login", post(handlers::login))
}
