//! HTTP interface: routing, middleware, and the endpoint modules

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::application::BillingService;
use crate::infrastructure::crypto::jwt::JwtConfig;

/// Shared state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: Arc<JwtConfig>,
    pub billing: Arc<BillingService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt: JwtConfig, billing: Arc<BillingService>) -> Self {
        Self {
            db,
            jwt: Arc::new(jwt),
            billing,
        }
    }
}
