pub mod dto;
pub mod handlers;

use axum::{routing::get, Router};

use crate::interfaces::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::liveness))
        .route("/ready", get(handlers::readiness))
}
