use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use skychain_domain::analytics::MaintenanceStatistics;
use skychain_domain::requests::{
    CompleteTaskRequest, MaintenanceRequest, MaintenanceUpdateRequest, SignatureRequest,
};
use skychain_domain::{MaintenanceStatus, Priority};
use skychain_fleet::{SignatureOutcome, WorkOrderView};
use skychain_store::{Page, PageRequest, WorkOrderFilter, DEFAULT_LIMIT};

use super::{non_blank, parse_param, run};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WorkOrderQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
    priority: Option<String>,
    aircraft: Option<String>,
    mechanic: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WorkOrderQuery>,
) -> ApiResult<Json<Page<WorkOrderView>>> {
    let filter = WorkOrderFilter {
        status: parse_param("status", query.status.as_deref(), MaintenanceStatus::parse)?,
        priority: parse_param("priority", query.priority.as_deref(), Priority::parse)?,
        aircraft: non_blank(&query.aircraft),
        mechanic: non_blank(&query.mechanic),
    };
    let page = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT);
    run(&state, move |svc| svc.list_work_orders(&filter, page)).await.map(Json)
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkOrderView>> {
    run(&state, move |svc| svc.get_work_order(&id)).await.map(Json)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MaintenanceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WorkOrderView>)> {
    let Json(request) = body?;
    let view = run(&state, move |svc| svc.create_work_order(&request)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<MaintenanceUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<WorkOrderView>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.update_work_order(&id, &request)).await.map(Json)
}

pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<CompleteTaskRequest>, JsonRejection>,
) -> ApiResult<Json<WorkOrderView>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.complete_task(&id, &request)).await.map(Json)
}

pub async fn sign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<SignatureRequest>, JsonRejection>,
) -> ApiResult<Json<SignatureOutcome>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.sign_work_order(&id, &request)).await.map(Json)
}

pub async fn statistics(State(state): State<Arc<AppState>>) -> ApiResult<Json<MaintenanceStatistics>> {
    run(&state, |svc| svc.maintenance_statistics()).await.map(Json)
}

pub async fn calendar(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(i32, u32)>, PathRejection>,
) -> ApiResult<Json<Vec<WorkOrderView>>> {
    let Path((year, month)) = path?;
    run(&state, move |svc| svc.maintenance_calendar(year, month)).await.map(Json)
}
