pub mod dto;
pub mod handlers;

use axum::{routing::get, Router};

use crate::interfaces::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::summary))
        .route("/revenue", get(handlers::revenue))
        .route("/operations", get(handlers::operations))
        .route("/vehicles", get(handlers::vehicle_stats))
}
