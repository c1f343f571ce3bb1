pub mod dto;
pub mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::interfaces::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_tariffs))
        .route("/", post(handlers::create_tariff))
        .route("/preview", post(handlers::preview_fee))
        .route("/{key}", get(handlers::get_tariff))
        .route("/{key}", put(handlers::update_tariff))
        .route("/{key}", delete(handlers::deactivate_tariff))
}
