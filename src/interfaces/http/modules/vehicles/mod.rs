pub mod dto;
pub mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::interfaces::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_vehicle))
        .route("/", get(handlers::list_vehicles))
        .route("/{id}", get(handlers::get_vehicle))
        .route("/{id}", put(handlers::update_vehicle))
        .route("/{id}", delete(handlers::delete_vehicle))
}
