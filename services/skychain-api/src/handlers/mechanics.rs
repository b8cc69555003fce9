use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use skychain_domain::analytics::MechanicStatistics;
use skychain_domain::requests::{CertificationRequest, MechanicRequest, MechanicUpdateRequest};
use skychain_domain::{AvailabilityStatus, Certification, PerformanceUpdate};
use skychain_fleet::{MechanicDetail, MechanicView, PerformanceOutcome, WorkOrderView};
use skychain_store::{MechanicFilter, Page, PageRequest, DEFAULT_LIMIT};

use super::{non_blank, parse_param, run, Paging};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MechanicQuery {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
    specialty: Option<String>,
    /// Availability status
    status: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MechanicQuery>,
) -> ApiResult<Json<Page<MechanicView>>> {
    let filter = MechanicFilter {
        search: non_blank(&query.search),
        specialty: non_blank(&query.specialty),
        availability: parse_param("status", query.status.as_deref(), AvailabilityStatus::parse)?,
    };
    let page = PageRequest::new(query.page, query.limit, DEFAULT_LIMIT);
    run(&state, move |svc| svc.list_mechanics(&filter, page)).await.map(Json)
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MechanicDetail>> {
    run(&state, move |svc| svc.get_mechanic(&id)).await.map(Json)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MechanicRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MechanicView>)> {
    let Json(request) = body?;
    let view = run(&state, move |svc| svc.create_mechanic(&request)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<MechanicUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<MechanicView>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.update_mechanic(&id, &request)).await.map(Json)
}

pub async fn update_performance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<PerformanceUpdate>, JsonRejection>,
) -> ApiResult<Json<PerformanceOutcome>> {
    let Json(update) = body?;
    run(&state, move |svc| svc.update_mechanic_performance(&id, &update)).await.map(Json)
}

pub async fn work_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(paging): Query<Paging>,
) -> ApiResult<Json<Page<WorkOrderView>>> {
    let page = paging.request(DEFAULT_LIMIT);
    run(&state, move |svc| svc.mechanic_work_history(&id, page)).await.map(Json)
}

pub async fn add_certification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<CertificationRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<Certification>>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.add_certification(&id, &request)).await.map(Json)
}

pub async fn statistics(State(state): State<Arc<AppState>>) -> ApiResult<Json<MechanicStatistics>> {
    run(&state, |svc| svc.mechanic_statistics()).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::super::testing::{self, get, post, put};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_hides_credentials() {
        let (app, _clock) = testing::app();
        let id = testing::create_mechanic(&app, "E100", "Sam@Example.com").await;

        let (status, body) = get(&app, &format!("/api/mechanics/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "sam@example.com");
        assert_eq!(body["currentTasks"], json!([]));
        assert!(body.get("password").is_none());
        assert!(body.get("privateKey").is_none());
        assert!(!body.to_string().contains("hunter22"));
    }

    #[tokio::test]
    async fn test_duplicate_employee_id() {
        let (app, _clock) = testing::app();
        testing::create_mechanic(&app, "E100", "a@example.com").await;
        let (status, body) = post(
            &app,
            "/api/mechanics",
            json!({
                "employeeId": "E100",
                "name": "Other",
                "email": "b@example.com",
                "password": "hunter22",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email or employee ID already exists");
    }

    #[tokio::test]
    async fn test_performance_and_certifications() {
        let (app, _clock) = testing::app();
        let id = testing::create_mechanic(&app, "E100", "a@example.com").await;

        let (status, body) = post(
            &app,
            &format!("/api/mechanics/{id}/update-performance"),
            json!({ "qualityScore": 90, "onTimeCompletion": 80, "complianceRate": 100 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reputationScore"], 900);

        let (status, body) = post(
            &app,
            &format!("/api/mechanics/{id}/add-certification"),
            json!({ "name": "A&P", "number": "12345" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, stats) = get(&app, "/api/mechanics/statistics").await;
        assert_eq!(stats["totalMechanics"], 1);
        assert_eq!(stats["totalCertifications"], 1);

        let (status, body) = post(&app, "/api/mechanics/ghost/update-performance", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Mechanic not found");
    }

    #[tokio::test]
    async fn test_availability_filter_and_history() {
        let (app, _clock) = testing::app();
        let a = testing::create_mechanic(&app, "E100", "a@example.com").await;
        testing::create_mechanic(&app, "E200", "b@example.com").await;

        let (status, _) = put(&app, &format!("/api/mechanics/{a}"), json!({ "availability": "busy" })).await;
        assert_eq!(status, StatusCode::OK);

        let (_, page) = get(&app, "/api/mechanics?status=busy").await;
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["employeeId"], "E100");

        let (status, page) = get(&app, &format!("/api/mechanics/{a}/work-history?page=1&limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 0);
    }
}
