pub mod dto;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interfaces::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/spots", get(handlers::list_spots))
        .route("/check-in", post(handlers::check_in))
        .route("/check-out", post(handlers::check_out))
        .route("/request-exit", post(handlers::request_exit))
        .route("/active", get(handlers::active_stays))
        .route("/check-ins", get(handlers::check_in_history))
        .route("/check-outs", get(handlers::check_out_history))
}
