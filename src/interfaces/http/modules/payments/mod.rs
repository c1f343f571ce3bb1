pub mod dto;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interfaces::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_payment))
        .route("/", get(handlers::list_payments))
        .route("/{id}", get(handlers::get_payment))
        .route("/{id}/process", post(handlers::process_payment))
        .route("/{id}/cancel", post(handlers::cancel_payment))
}
