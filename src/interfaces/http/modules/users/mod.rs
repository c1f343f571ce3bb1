pub mod dto;
pub mod handlers;

use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::interfaces::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users))
        .route("/{id}", get(handlers::get_user))
        .route("/{id}", put(handlers::update_user))
        .route("/{id}", delete(handlers::deactivate_user))
}
