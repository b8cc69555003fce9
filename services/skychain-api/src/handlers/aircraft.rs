use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use skychain_domain::requests::AircraftRequest;
use skychain_domain::AircraftStatus;
use skychain_fleet::{AircraftView, PartView, WorkOrderView};
use skychain_store::{AircraftFilter, Page, PageRequest, DEFAULT_LIMIT};

use super::{non_blank, parse_param, run};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AircraftQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
    search: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AircraftQuery>,
) -> ApiResult<Json<Page<AircraftView>>> {
    let filter = AircraftFilter {
        status: parse_param("status", query.status.as_deref(), AircraftStatus::parse)?,
        search: non_blank(&query.search),
    };
    let page = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT);
    run(&state, move |svc| svc.list_aircraft(&filter, page)).await.map(Json)
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<AircraftView>> {
    run(&state, move |svc| svc.get_aircraft(&id)).await.map(Json)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AircraftRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AircraftView>)> {
    let Json(request) = body?;
    let view = run(&state, move |svc| svc.create_aircraft(&request)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<AircraftRequest>, JsonRejection>,
) -> ApiResult<Json<AircraftView>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.update_aircraft(&id, &request)).await.map(Json)
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    run(&state, move |svc| svc.delete_aircraft(&id)).await?;
    Ok(Json(json!({ "message": "Aircraft deleted successfully" })))
}

pub async fn maintenance_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<WorkOrderView>>> {
    run(&state, move |svc| svc.aircraft_maintenance_history(&id)).await.map(Json)
}

pub async fn parts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PartView>>> {
    run(&state, move |svc| svc.aircraft_parts(&id)).await.map(Json)
}

pub async fn generate_qr(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let qr_code = run(&state, move |svc| svc.generate_aircraft_qr(&id)).await?;
    Ok(Json(json!({ "qrCode": qr_code })))
}
