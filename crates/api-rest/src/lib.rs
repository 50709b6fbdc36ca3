//! # API REST
//!
//! REST API implementation for the ICU ward status service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Staff verification of the ward endpoints
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, request tracing)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod middleware;

use api_shared::{ConfigRes, ErrorBody, HealthRes, RiskUpdateReq, StaffReq, WardStatusRes};
use axum::routing::{get, post};
use axum::Router;
use icu_core::{StaffDirectory, WardStatusService};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state for the REST API server
///
/// Shared by every handler; all members are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub status_service: WardStatusService,
    pub staff: Arc<dyn StaffDirectory>,
    pub liff_id: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::config,
        handlers::icu_status,
        handlers::update_risk_level,
    ),
    components(schemas(
        HealthRes,
        ConfigRes,
        ErrorBody,
        StaffReq,
        WardStatusRes,
        RiskUpdateReq,
    ))
)]
pub struct ApiDoc;

/// Build the application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let ward_routes = Router::new()
        .route("/icuStatus", post(handlers::icu_status))
        .route("/icuBedRiskUpdate", post(handlers::update_risk_level))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_staff,
        ));

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::config))
        .merge(ward_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state);

    with_layers(app)
}

/// Middleware shared by every route, innermost first.
fn with_layers(app: Router) -> Router {
    app.layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
