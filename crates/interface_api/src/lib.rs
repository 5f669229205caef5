//! HTTP API Layer
//!
//! This crate provides the REST API for the brokerage using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for insured persons, policies and reports
//! - **Middleware**: Request ids, tracing and access logging
//! - **DTOs**: Query strings and JSON response bodies
//! - **Error Handling**: Consistent error responses
//!
//! Write endpoints take `application/x-www-form-urlencoded` bodies and pass
//! the field map to the service, which owns all validation.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_policy::BrokerageService;

use crate::config::ApiConfig;
use crate::handlers::{health, insured, policy, report};
use crate::middleware::access_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: BrokerageService,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(service: BrokerageService, config: ApiConfig) -> Self {
        Self { service, config }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Service and configuration shared by every handler
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let insured_routes = Router::new()
        .route("/", get(insured::list_insured).post(insured::create_insured))
        .route(
            "/:id",
            get(insured::get_insured)
                .put(insured::update_insured)
                .delete(insured::delete_insured),
        )
        .route("/:id/policies", post(insured::create_policy));

    let policy_routes = Router::new()
        .route("/", get(policy::list_policies))
        .route(
            "/:code",
            get(policy::get_policy)
                .put(policy::update_policy)
                .delete(policy::delete_policy),
        );

    let report_routes = Router::new().route("/commission", get(report::commission_report));

    let api_routes = Router::new()
        .nest("/insured", insured_routes)
        .nest("/policies", policy_routes)
        .nest("/reports", report_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(access_log_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
