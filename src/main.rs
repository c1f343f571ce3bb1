use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use metrics_exporter_prometheus::PrometheusBuilder;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use valetti_parking::application::BillingService;
use valetti_parking::config::AppConfig;
use valetti_parking::infrastructure::crypto::jwt::JwtConfig;
use valetti_parking::infrastructure::crypto::password::hash_password;
use valetti_parking::infrastructure::database::entities::user::{self, UserRole};
use valetti_parking::infrastructure::database::migrator::Migrator;
use valetti_parking::infrastructure::{init_database, DatabaseConfig};
use valetti_parking::interfaces::http::router::{build_router, RateLimit};
use valetti_parking::interfaces::http::AppState;
use valetti_parking::shared::shutdown::shutdown_signal;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Create the bootstrap admin account when the users table is empty.
async fn ensure_admin_account(
    db: &DatabaseConnection,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let count = user::Entity::find().count(db).await?;
    if count > 0 {
        return Ok(());
    }

    let now = Utc::now();
    let admin = user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        email: Set(config.admin.email.to_lowercase()),
        name: Set(config.admin.name.clone()),
        phone: Set(None),
        password_hash: Set(hash_password(&config.admin.password)?),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        last_login_at: Set(None),
    };
    admin.insert(db).await?;

    warn!(
        email = %config.admin.email,
        "bootstrap admin created; change its password immediately"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_default()?;
    init_tracing(&config);

    info!("Starting parking-service v{}", env!("CARGO_PKG_VERSION"));

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    let db = init_database(&DatabaseConfig {
        url: config.database.url.clone(),
    })
    .await?;
    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    ensure_admin_account(&db, &config).await?;

    let billing = Arc::new(BillingService::new(db.clone()));
    let profiles = billing.reload().await?;
    info!("Loaded {} tariff profiles", profiles);

    let jwt = JwtConfig {
        secret: config.security.jwt_secret.clone(),
        expiration_hours: config.security.jwt_expiration_hours,
        issuer: "parking-service".to_string(),
    };

    let state = AppState::new(db, jwt, billing);
    let rate_limit = RateLimit {
        per_second: config.rate_limit.per_second,
        burst: config.rate_limit.burst,
    };
    let app = build_router(state, metrics_handle, &rate_limit);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}
