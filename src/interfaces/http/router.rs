//! Route table, OpenAPI document and the middleware stack

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use super::middleware::{auth_middleware, track_metrics};
use super::modules::{auth, dashboard, health, parking, payments, tariffs, users, vehicles};
use super::AppState;

/// Throttling applied to the public login route
#[derive(Debug, Clone)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst: 10,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::liveness,
        health::handlers::readiness,
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::me,
        auth::handlers::change_password,
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::update_user,
        users::handlers::deactivate_user,
        vehicles::handlers::create_vehicle,
        vehicles::handlers::list_vehicles,
        vehicles::handlers::get_vehicle,
        vehicles::handlers::update_vehicle,
        vehicles::handlers::delete_vehicle,
        parking::handlers::list_spots,
        parking::handlers::check_in,
        parking::handlers::check_out,
        parking::handlers::request_exit,
        parking::handlers::active_stays,
        parking::handlers::check_in_history,
        parking::handlers::check_out_history,
        payments::handlers::create_payment,
        payments::handlers::list_payments,
        payments::handlers::get_payment,
        payments::handlers::process_payment,
        payments::handlers::cancel_payment,
        tariffs::handlers::list_tariffs,
        tariffs::handlers::get_tariff,
        tariffs::handlers::create_tariff,
        tariffs::handlers::update_tariff,
        tariffs::handlers::deactivate_tariff,
        tariffs::handlers::preview_fee,
        dashboard::handlers::summary,
        dashboard::handlers::revenue,
        dashboard::handlers::operations,
        dashboard::handlers::vehicle_stats,
    ),
    components(schemas(
        health::dto::HealthResponse,
        health::dto::ReadinessResponse,
        auth::dto::RegisterRequest,
        auth::dto::LoginRequest,
        auth::dto::ChangePasswordRequest,
        auth::dto::UserResponse,
        auth::dto::AuthResponse,
        users::dto::UpdateUserRequest,
        vehicles::dto::CreateVehicleRequest,
        vehicles::dto::UpdateVehicleRequest,
        vehicles::dto::VehicleResponse,
        parking::dto::SpotResponse,
        parking::dto::CheckInRequest,
        parking::dto::CheckInResponse,
        parking::dto::CheckOutRequest,
        parking::dto::CheckOutResponse,
        parking::dto::RequestExitRequest,
        parking::dto::ActiveStayResponse,
        parking::dto::CheckInHistoryItem,
        parking::dto::CheckOutHistoryItem,
        payments::dto::CreatePaymentRequest,
        payments::dto::PaymentResponse,
        tariffs::dto::CreateTariffRequest,
        tariffs::dto::UpdateTariffRequest,
        tariffs::dto::PreviewRequest,
        tariffs::dto::PreviewResponse,
        tariffs::dto::TariffResponse,
        dashboard::dto::SpotStats,
        dashboard::dto::MethodRevenue,
        dashboard::dto::DashboardSummary,
        dashboard::dto::RevenueReport,
        dashboard::dto::OperatorCount,
        dashboard::dto::OperationsReport,
        dashboard::dto::LabelCount,
        dashboard::dto::VehicleStats,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness and readiness"),
        (name = "auth", description = "Authentication"),
        (name = "users", description = "Staff management"),
        (name = "vehicles", description = "Vehicle registry"),
        (name = "parking", description = "Spots, check-in and check-out"),
        (name = "payments", description = "Payment settlement"),
        (name = "tariffs", description = "Pricing rules and fee preview"),
        (name = "dashboard", description = "Operational snapshot"),
    ),
    info(
        title = "Parking Service API",
        description = "Parking lot management: vehicles, spots, stays and billing"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Assemble the full application router.
pub fn build_router(
    state: AppState,
    metrics_handle: PrometheusHandle,
    rate_limit: &RateLimit,
) -> Router {
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(rate_limit.per_second.max(1))
            .burst_size(rate_limit.burst.max(1))
            .finish()
            .unwrap_or_default(),
    );

    let protected = Router::new()
        .nest("/users", users::router())
        .nest("/vehicles", vehicles::router())
        .nest("/parking", parking::router())
        .nest("/payments", payments::router())
        .nest("/tariffs", tariffs::router())
        .nest("/dashboard", dashboard::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api = Router::new()
        .nest(
            "/auth",
            auth::public_router().layer(GovernorLayer::new(governor_config)),
        )
        .nest("/auth", auth::protected_router(state.clone()))
        .merge(protected);

    Router::new()
        .nest("/health", health::router())
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        )
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use axum::body::{to_bytes, Body};
    use axum::extract::ConnectInfo;
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use sea_orm_migration::MigratorTrait;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::application::BillingService;
    use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
    use crate::infrastructure::database::entities::vehicle::{self, VehicleStatus, VehicleType};
    use crate::infrastructure::database::migrator::Migrator;

    async fn test_app() -> (Router, AppState) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let billing = std::sync::Arc::new(BillingService::new(db.clone()));
        billing.reload().await.unwrap();

        let jwt = JwtConfig {
            secret: "router-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "parking-service".to_string(),
        };
        let state = AppState::new(db, jwt, billing);
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let app = build_router(state.clone(), handle, &RateLimit::default());
        (app, state)
    }

    fn token(state: &AppState, role: &str) -> String {
        create_token("test-operator", "op@parking.local", role, &state.jwt).unwrap()
    }

    fn authed_json(
        method: &str,
        uri: &str,
        token: &str,
        body: Value,
    ) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn insert_vehicle(db: &DatabaseConnection, plate: &str, tariff_key: &str) {
        let now = Utc::now();
        vehicle::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            plate: Set(plate.to_string()),
            model: Set("Uno".to_string()),
            brand: Set(None),
            color: Set(None),
            vehicle_type: Set(VehicleType::Car),
            owner_name: Set(None),
            owner_phone: Set(None),
            tariff_key: Set(tariff_key.to_string()),
            status: Set(VehicleStatus::Reserved),
            spot_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::get("/api/v1/vehicles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(
                Request::get("/api/v1/vehicles")
                    .header(header::AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_rejects_unknown_credentials() {
        let (app, _) = test_app().await;
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"email": "ghost@parking.local", "password": "whatever1"}).to_string(),
            ))
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 9999))));

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn preview_rejects_unknown_profile() {
        let (app, state) = test_app().await;
        let request = authed_json(
            "POST",
            "/api/v1/tariffs/preview",
            &token(&state, "valet"),
            json!({"tariff_key": "fantasma", "elapsed_minutes": 30}),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn preview_rejects_negative_duration() {
        let (app, state) = test_app().await;
        let request = authed_json(
            "POST",
            "/api/v1/tariffs/preview",
            &token(&state, "valet"),
            json!({"tariff_key": "avulso", "elapsed_minutes": -5}),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn preview_prices_the_ninety_five_minute_example() {
        let (app, state) = test_app().await;
        let request = authed_json(
            "POST",
            "/api/v1/tariffs/preview",
            &token(&state, "receptionist"),
            json!({"tariff_key": "avulso", "elapsed_minutes": 95}),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["amount"], 3000);
        assert_eq!(body["data"]["amount_formatted"], "30.00");
    }

    #[tokio::test]
    async fn invalid_body_fails_validation_with_details() {
        let (app, state) = test_app().await;
        // plate below the minimum length, model missing entirely
        let request = authed_json(
            "POST",
            "/api/v1/vehicles",
            &token(&state, "valet"),
            json!({"plate": "AB"}),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        // missing field -> body rejection, handled before validator runs
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = authed_json(
            "POST",
            "/api/v1/vehicles",
            &token(&state, "valet"),
            json!({"plate": "AB", "model": "Uno"}),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["details"].as_array().is_some_and(|d| !d.is_empty()));
    }

    #[tokio::test]
    async fn tariff_mutations_are_denied_to_valets() {
        let (app, state) = test_app().await;
        let request = authed_json(
            "POST",
            "/api/v1/tariffs",
            &token(&state, "valet"),
            json!({
                "key": "noturno",
                "display_name": "Noturno",
                "billing_mode": "flat",
                "fixed_amount": 2500
            }),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn check_in_then_check_out_round_trip() {
        let (app, state) = test_app().await;
        insert_vehicle(&state.db, "ABC1D23", "avulso").await;
        let auth = token(&state, "valet");

        let response = app
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/v1/parking/check-in",
                &auth,
                json!({"plate": "ABC1D23"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let ticket = body["data"]["ticket_number"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["spot_code"], "BAR-01");

        // a second check-in for the same plate conflicts
        let response = app
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/v1/parking/check-in",
                &auth,
                json!({"plate": "ABC1D23"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/v1/parking/check-out",
                &auth,
                json!({"ticket_number": ticket}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        // sub-minute stay lands in the grace tier
        assert_eq!(body["data"]["total_amount"], 500);
        assert_eq!(body["data"]["plate"], "ABC1D23");

        // settling the same ticket twice conflicts
        let response = app
            .oneshot(authed_json(
                "POST",
                "/api/v1/parking/check-out",
                &auth,
                json!({"ticket_number": ticket}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn check_out_with_unknown_tariff_is_rejected() {
        let (app, state) = test_app().await;
        // a tariff key that bypassed write-time validation must still fail
        // loudly at settlement, never default
        insert_vehicle(&state.db, "XYZ9K88", "fantasma").await;
        let auth = token(&state, "valet");

        let response = app
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/v1/parking/check-in",
                &auth,
                json!({"plate": "XYZ9K88"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let ticket = body["data"]["ticket_number"].as_str().unwrap().to_string();

        let response = app
            .oneshot(authed_json(
                "POST",
                "/api/v1/parking/check-out",
                &auth,
                json!({"ticket_number": ticket}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
