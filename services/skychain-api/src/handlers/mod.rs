//! Route table and shared handler plumbing
//!
//! Fleet operations are synchronous and hit SQLite, so each handler hands its
//! work to [`run`], which moves it onto the blocking pool.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use skychain_fleet::FleetService;
use skychain_store::PageRequest;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub mod aircraft;
pub mod analytics;
pub mod blockchain;
pub mod health;
pub mod maintenance;
pub mod mechanics;
pub mod parts;

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/aircraft", get(aircraft::list).post(aircraft::create))
        .route(
            "/aircraft/:id",
            get(aircraft::get).put(aircraft::update).delete(aircraft::delete),
        )
        .route("/aircraft/:id/maintenance-history", get(aircraft::maintenance_history))
        .route("/aircraft/:id/parts", get(aircraft::parts))
        .route("/aircraft/:id/generate-qr", post(aircraft::generate_qr))
        .route("/parts", get(parts::list).post(parts::create))
        .route("/parts/statistics", get(parts::statistics))
        .route("/parts/scan-qr", post(parts::scan_qr))
        .route("/parts/:id", get(parts::get).put(parts::update))
        .route("/parts/:id/verify-authenticity", post(parts::verify))
        .route("/parts/:id/add-inspection", post(parts::add_inspection))
        .route("/maintenance", get(maintenance::list).post(maintenance::create))
        .route("/maintenance/statistics", get(maintenance::statistics))
        .route("/maintenance/calendar/:year/:month", get(maintenance::calendar))
        .route("/maintenance/:id", get(maintenance::get).put(maintenance::update))
        .route("/maintenance/:id/complete-task", post(maintenance::complete_task))
        .route("/maintenance/:id/digital-signature", post(maintenance::sign))
        .route("/mechanics", get(mechanics::list).post(mechanics::create))
        .route("/mechanics/statistics", get(mechanics::statistics))
        .route("/mechanics/:id", get(mechanics::get).put(mechanics::update))
        .route("/mechanics/:id/update-performance", post(mechanics::update_performance))
        .route("/mechanics/:id/work-history", get(mechanics::work_history))
        .route("/mechanics/:id/add-certification", post(mechanics::add_certification))
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/analytics/fleet-performance", get(analytics::fleet_performance))
        .route("/analytics/maintenance-trends", get(analytics::maintenance_trends))
        .route("/analytics/mechanic-performance", get(analytics::mechanic_performance))
        .route("/analytics/blockchain-metrics", get(analytics::blockchain_metrics))
        .route("/analytics/roi-calculator", get(analytics::roi))
        .route("/blockchain/network-stats", get(blockchain::network_stats))
        .route("/blockchain/transactions", get(blockchain::transactions))
        .route("/blockchain/transaction/:hash", get(blockchain::transaction))
        .route("/blockchain/execute-contract", post(blockchain::execute_contract))
        .route("/blockchain/verify-signature", post(blockchain::verify_signature))
        .route(
            "/blockchain/entity-transactions/:entity_type/:entity_id",
            get(blockchain::entity_transactions),
        );

    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        .with_state(state)
}

async fn route_not_found() -> ApiError {
    ApiError::new(axum::http::StatusCode::NOT_FOUND, "Route not found")
}

/// Run a fleet operation on the blocking pool and map its error
pub(crate) async fn run<T, F>(state: &Arc<AppState>, op: F) -> ApiResult<T>
where
    F: FnOnce(&FleetService) -> skychain_fleet::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    let expose = state.expose_internal_errors();
    tokio::task::spawn_blocking(move || op(service.as_ref()))
        .await?
        .map_err(|err| ApiError::from_fleet(err, expose))
}

/// Bare `page`/`limit` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Paging {
    pub fn request(&self, default_limit: u32) -> PageRequest {
        PageRequest::new(self.page, self.limit, default_limit)
    }
}

/// Parse an optional enum-valued query parameter; blank counts as absent
pub(crate) fn parse_param<T>(
    name: &str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> ApiResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| ApiError::validation(vec![format!("\"{name}\" has an unknown value: {raw}")])),
    }
}

/// Blank strings count as absent
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
