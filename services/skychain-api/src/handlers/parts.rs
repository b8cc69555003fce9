use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use skychain_domain::analytics::PartStatistics;
use skychain_domain::requests::{InspectionRequest, PartRequest, ScanQrRequest};
use skychain_domain::PartStatus;
use skychain_fleet::{PartView, ScanOutcome, VerificationOutcome};
use skychain_store::{Page, PageRequest, PartFilter, DEFAULT_LIMIT};

use super::{non_blank, parse_param, run};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PartQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
    search: Option<String>,
    aircraft: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PartQuery>,
) -> ApiResult<Json<Page<PartView>>> {
    let filter = PartFilter {
        status: parse_param("status", query.status.as_deref(), PartStatus::parse)?,
        search: non_blank(&query.search),
        aircraft: non_blank(&query.aircraft),
    };
    let page = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT);
    run(&state, move |svc| svc.list_parts(&filter, page)).await.map(Json)
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<PartView>> {
    run(&state, move |svc| svc.get_part(&id)).await.map(Json)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PartRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PartView>)> {
    let Json(request) = body?;
    let view = run(&state, move |svc| svc.create_part(&request)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<PartRequest>, JsonRejection>,
) -> ApiResult<Json<PartView>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.update_part(&id, &request)).await.map(Json)
}

pub async fn verify(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<VerificationOutcome>> {
    run(&state, move |svc| svc.verify_part(&id)).await.map(Json)
}

pub async fn add_inspection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<InspectionRequest>, JsonRejection>,
) -> ApiResult<Json<PartView>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.add_part_inspection(&id, &request)).await.map(Json)
}

pub async fn statistics(State(state): State<Arc<AppState>>) -> ApiResult<Json<PartStatistics>> {
    run(&state, |svc| svc.part_statistics()).await.map(Json)
}

pub async fn scan_qr(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScanQrRequest>, JsonRejection>,
) -> ApiResult<Json<ScanOutcome>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.scan_part_qr(&request)).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{self, get, post};
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    fn part_body(serial: &str, aircraft: &str) -> Value {
        json!({
            "partNumber": "pn-100",
            "name": "Fuel pump",
            "manufacturer": "Acme Aero",
            "serialNumber": serial,
            "aircraft": aircraft,
            "installDate": testing::date(-30),
            "location": "Left wing",
            "nextInspection": testing::date(90),
        })
    }

    #[tokio::test]
    async fn test_part_verification_with_authentic_stub() {
        let (app, _clock) = testing::app();
        let aircraft = testing::create_aircraft(&app, "N1", 30).await;

        let (status, part) = post(&app, "/api/parts", part_body("SN-000001", &aircraft)).await;
        assert_eq!(status, StatusCode::CREATED, "{part}");
        assert_eq!(part["partNumber"], "PN-100");
        assert_eq!(part["status"], "pending");
        let id = part["id"].as_str().unwrap();

        let (status, outcome) = post(&app, &format!("/api/parts/{id}/verify-authenticity"), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["isAuthentic"], true);
        assert_eq!(outcome["status"], "authentic");
        assert!(!outcome["verificationDate"].is_null());
        assert!(outcome["blockchainProof"].as_str().unwrap().starts_with("0x"));

        let (_, part) = get(&app, &format!("/api/parts/{id}")).await;
        assert_eq!(part["status"], "authentic");
        assert_eq!(part["authenticity"]["verified"], true);

        let (_, stats) = get(&app, "/api/parts/statistics").await;
        assert_eq!(stats["totalParts"], 1);
    }

    #[tokio::test]
    async fn test_part_requires_existing_aircraft() {
        let (app, _clock) = testing::app();
        let (status, body) = post(&app, "/api/parts", part_body("SN-000001", "ghost")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Aircraft not found");
    }

    #[tokio::test]
    async fn test_scan_qr_lookup() {
        let (app, _clock) = testing::app();
        let (status, body) = post(&app, "/api/parts/scan-qr", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0], "QR code is required");

        let (status, body) = post(&app, "/api/parts/scan-qr", json!({ "qrCode": "0xnothing" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Part not found for this QR code");
    }

    #[tokio::test]
    async fn test_aircraft_lists_its_parts() {
        let (app, _clock) = testing::app();
        let aircraft = testing::create_aircraft(&app, "N1", 30).await;
        post(&app, "/api/parts", part_body("SN-000001", &aircraft)).await;
        post(&app, "/api/parts", part_body("SN-000002", &aircraft)).await;

        let (status, body) = get(&app, &format!("/api/aircraft/{aircraft}/parts")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, page) = get(&app, &format!("/api/parts?aircraft={aircraft}&search=sn-000002")).await;
        assert_eq!(page["total"], 1);
    }
}
