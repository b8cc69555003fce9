use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use skychain_domain::analytics::{
    BlockchainMetrics, Dashboard, ManufacturerPerformance, MechanicRanking, MonthlyTrend, RoiReport,
};

use super::run;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    months: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiQuery {
    fleet_size: Option<u32>,
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> ApiResult<Json<Dashboard>> {
    run(&state, |svc| svc.dashboard()).await.map(Json)
}

pub async fn fleet_performance(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ManufacturerPerformance>>> {
    run(&state, |svc| svc.fleet_performance()).await.map(Json)
}

pub async fn maintenance_trends(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Json<Vec<MonthlyTrend>>> {
    run(&state, move |svc| svc.maintenance_trends(query.months)).await.map(Json)
}

pub async fn mechanic_performance(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<MechanicRanking>>> {
    run(&state, |svc| svc.mechanic_performance()).await.map(Json)
}

pub async fn blockchain_metrics(State(state): State<Arc<AppState>>) -> ApiResult<Json<BlockchainMetrics>> {
    run(&state, |svc| svc.blockchain_metrics()).await.map(Json)
}

pub async fn roi(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoiQuery>,
) -> ApiResult<Json<RoiReport>> {
    Ok(Json(state.service.roi(query.fleet_size)))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{self, get};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_dashboard_reflects_fleet() {
        let (app, _clock) = testing::app();
        testing::create_aircraft(&app, "N1", 60).await;
        testing::create_aircraft(&app, "N2", 3).await;

        let (status, body) = get(&app, "/api/analytics/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["kpis"]["totalAircraft"], 2);
        assert_eq!(body["kpis"]["alertAircraft"], 1);

        let (_, fleet) = get(&app, "/api/analytics/fleet-performance").await;
        assert_eq!(fleet.as_array().unwrap().len(), 1);

        let (_, metrics) = get(&app, "/api/analytics/blockchain-metrics").await;
        assert_eq!(metrics["totalTransactions"], 2);
    }

    #[tokio::test]
    async fn test_roi_query_parameter() {
        let (app, _clock) = testing::app();
        let (_, body) = get(&app, "/api/analytics/roi-calculator").await;
        assert_eq!(body["fleetSize"], 100);

        let (_, body) = get(&app, "/api/analytics/roi-calculator?fleetSize=10").await;
        assert_eq!(body["fleetSize"], 10);

        let (status, _) = get(&app, "/api/analytics/roi-calculator?fleetSize=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_rollups() {
        let (app, _clock) = testing::app();
        let (status, body) = get(&app, "/api/analytics/maintenance-trends?months=3").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_array());

        let (status, body) = get(&app, "/api/analytics/mechanic-performance").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 0);
    }
}
