//! HTTP API handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;
use utoipa::ToSchema;

use crate::arbitrage::calculator::Opportunity;
use crate::market::types::CategoryFilter;
use crate::scheduler::RefreshScheduler;
use crate::store::{OpportunityStore, ResultView};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Refresh pipeline handle.
    pub scheduler: RefreshScheduler,
    /// Published result sets.
    pub store: Arc<OpportunityStore>,
    /// Prometheus render handle, when an exporter is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(scheduler: RefreshScheduler, store: Arc<OpportunityStore>) -> Self {
        Self {
            scheduler,
            store,
            prometheus: None,
        }
    }

    /// Attach a Prometheus render handle for the metrics endpoint.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

fn rfc3339(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_default()
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether a first result set has been published.
    pub ready: bool,
    /// RFC 3339 time of the last publish, if any.
    pub last_updated: Option<String>,
}

/// Scanner status response.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Whether a fetch is in flight.
    pub is_fetching: bool,
    /// Whether the auto-refresh timer is armed.
    pub auto_refresh_enabled: bool,
    /// Active category filter.
    pub filter: String,
    /// Published opportunities before filtering.
    pub opportunities: usize,
    /// RFC 3339 time of the last publish, if any.
    pub last_updated: Option<String>,
    /// Most recent fetch failure, cleared on success.
    pub last_error: Option<String>,
}

/// One opportunity, formatted for display.
#[derive(Debug, Serialize, ToSchema)]
pub struct OpportunityDto {
    /// Snapshot row id.
    pub id: usize,
    /// Event name.
    pub event: String,
    /// Event category.
    pub category: String,
    /// Polymarket YES price.
    pub polymarket_yes: String,
    /// Polymarket NO price.
    pub polymarket_no: String,
    /// Polymarket complete set cost.
    pub polymarket_total: String,
    /// Opinion Labs YES price.
    pub opinion_yes: String,
    /// Opinion Labs NO price.
    pub opinion_no: String,
    /// Opinion Labs complete set cost.
    pub opinion_total: String,
    /// Profit percentage buying on Polymarket.
    pub profit_buy_polymarket: String,
    /// Profit percentage buying on Opinion Labs.
    pub profit_buy_opinion: String,
    /// Best profit percentage.
    pub max_profit: String,
    /// Side the max profit comes from.
    pub direction: String,
    /// Trade plan for the best side.
    pub strategy: String,
    /// RFC 3339 computation time.
    pub computed_at: String,
}

impl From<&Opportunity> for OpportunityDto {
    fn from(opp: &Opportunity) -> Self {
        Self {
            id: opp.event_id,
            event: opp.event_name.clone(),
            category: opp.category.to_string(),
            polymarket_yes: opp.polymarket.yes.round_dp(4).to_string(),
            polymarket_no: opp.polymarket.no.round_dp(4).to_string(),
            polymarket_total: opp.polymarket_total.round_dp(4).to_string(),
            opinion_yes: opp.opinion.yes.round_dp(4).to_string(),
            opinion_no: opp.opinion.no.round_dp(4).to_string(),
            opinion_total: opp.opinion_total.round_dp(4).to_string(),
            profit_buy_polymarket: opp.profit_buy_polymarket.round_dp(2).to_string(),
            profit_buy_opinion: opp.profit_buy_opinion.round_dp(2).to_string(),
            max_profit: opp.max_profit.round_dp(2).to_string(),
            direction: opp.direction.to_string(),
            strategy: opp.direction.strategy(),
            computed_at: rfc3339(opp.computed_at),
        }
    }
}

/// Filtered result set with aggregates.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    /// Filter the view was projected through.
    pub filter: String,
    /// Opportunities, best profit first.
    pub items: Vec<OpportunityDto>,
    /// Number of items.
    pub count: usize,
    /// Mean max profit over the items; "0" when empty.
    pub average_profit: String,
    /// Sum of max profits over the items.
    pub total_profit: String,
}

impl ViewResponse {
    /// Build a response from a store projection.
    pub fn from_view(filter: CategoryFilter, view: &ResultView) -> Self {
        Self {
            filter: filter.to_string(),
            items: view.items.iter().map(OpportunityDto::from).collect(),
            count: view.count,
            average_profit: view.average_profit.round_dp(2).to_string(),
            total_profit: view.total_profit.round_dp(2).to_string(),
        }
    }
}

/// Manual refresh response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    /// Whether the trigger started a refresh.
    pub accepted: bool,
    /// Whether a fetch is in flight.
    pub is_fetching: bool,
}

/// Category filter change request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FilterRequest {
    /// Category name, or "all".
    pub category: String,
}

/// Auto-refresh toggle request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AutoRefreshRequest {
    /// Desired timer state.
    pub enabled: bool,
}

/// Auto-refresh toggle response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleResponse {
    /// Timer state after the change.
    pub auto_refresh_enabled: bool,
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// What was wrong with the request.
    pub error: String,
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 once a result set has been published.
#[utoipa::path(
    get,
    path = "/ready",
    responses(
        (status = 200, description = "First result set published", body = ReadyResponse),
        (status = 503, description = "No result set yet", body = ReadyResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let last_updated = state.scheduler.last_updated().await;
    let response = ReadyResponse {
        ready: last_updated.is_some(),
        last_updated: last_updated.map(rfc3339),
    };

    if response.ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Status handler - returns scanner state and refresh bookkeeping.
#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses((status = 200, description = "Scanner status", body = StatusResponse))
)]
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let last_updated = state.scheduler.last_updated().await;
    let status = if last_updated.is_some() {
        "running"
    } else {
        "starting"
    };

    Json(StatusResponse {
        status,
        is_fetching: state.scheduler.is_fetching(),
        auto_refresh_enabled: state.scheduler.auto_refresh_enabled(),
        filter: state.store.filter().await.to_string(),
        opportunities: state.store.len_unfiltered().await,
        last_updated: last_updated.map(rfc3339),
        last_error: state.scheduler.last_error().await,
    })
}

/// Opportunities handler - returns the filtered, sorted result set.
#[utoipa::path(
    get,
    path = "/api/v1/opportunities",
    responses((status = 200, description = "Current result set", body = ViewResponse))
)]
pub async fn opportunities(State(state): State<AppState>) -> impl IntoResponse {
    let filter = state.store.filter().await;
    let view = state.store.view().await;
    Json(ViewResponse::from_view(filter, &view))
}

/// Manual refresh handler - requests a refresh, dropped if one is in flight.
#[utoipa::path(
    post,
    path = "/api/v1/refresh",
    responses(
        (status = 202, description = "Refresh started", body = RefreshResponse),
        (status = 200, description = "Refresh already in flight; request dropped", body = RefreshResponse)
    )
)]
pub async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    let accepted = state.scheduler.trigger();
    let code = if accepted {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    (
        code,
        Json(RefreshResponse {
            accepted,
            is_fetching: state.scheduler.is_fetching(),
        }),
    )
}

/// Filter handler - changes the category filter and returns the new view.
#[utoipa::path(
    put,
    path = "/api/v1/filter",
    request_body = FilterRequest,
    responses(
        (status = 200, description = "Filter applied", body = ViewResponse),
        (status = 400, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn set_filter(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> Response {
    match request.category.parse::<CategoryFilter>() {
        Ok(filter) => {
            state.store.set_filter(filter).await;
            info!(filter = %filter, "Category filter changed");
            let view = state.store.view().await;
            Json(ViewResponse::from_view(filter, &view)).into_response()
        }
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("unknown category: {}", request.category),
            }),
        )
            .into_response(),
    }
}

/// Auto-refresh handler - arms or cancels the refresh timer.
#[utoipa::path(
    put,
    path = "/api/v1/auto-refresh",
    request_body = AutoRefreshRequest,
    responses((status = 200, description = "Timer state changed", body = ToggleResponse))
)]
pub async fn set_auto_refresh(
    State(state): State<AppState>,
    Json(request): Json<AutoRefreshRequest>,
) -> impl IntoResponse {
    state.scheduler.set_auto_refresh(request.enabled);
    Json(ToggleResponse {
        auto_refresh_enabled: state.scheduler.auto_refresh_enabled(),
    })
}

/// Prometheus metrics handler - renders the exporter registry.
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus exposition text", body = String),
        (status = 404, description = "No exporter installed", body = String)
    )
)]
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
