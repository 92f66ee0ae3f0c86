//! HTTP API route definitions.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    __path_health, __path_opportunities, __path_prometheus_metrics, __path_ready, __path_refresh,
    __path_set_auto_refresh, __path_set_filter, __path_status, health, opportunities,
    prometheus_metrics, ready, refresh, set_auto_refresh, set_filter, status, AppState,
    AutoRefreshRequest, ErrorResponse, FilterRequest, HealthResponse, OpportunityDto,
    ReadyResponse, RefreshResponse, StatusResponse, ToggleResponse, ViewResponse,
};

/// OpenAPI document for the scanner API.
#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        ready,
        status,
        opportunities,
        refresh,
        set_filter,
        set_auto_refresh,
        prometheus_metrics,
    ),
    components(schemas(
        HealthResponse,
        ReadyResponse,
        StatusResponse,
        OpportunityDto,
        ViewResponse,
        RefreshResponse,
        FilterRequest,
        AutoRefreshRequest,
        ToggleResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Scanner endpoints
        .route("/api/v1/status", get(status))
        .route("/api/v1/opportunities", get(opportunities))
        .route("/api/v1/refresh", post(refresh))
        .route("/api/v1/filter", put(set_filter))
        .route("/api/v1/auto-refresh", put(set_auto_refresh))
        // Metrics endpoint
        .route("/metrics", get(prometheus_metrics))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
