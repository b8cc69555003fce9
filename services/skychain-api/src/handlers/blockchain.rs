use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use skychain_domain::requests::{ContractRequest, SignatureCheck, VerifySignatureRequest};
use skychain_domain::{EntityType, LedgerTransaction, TransactionStatus, TransactionType};
use skychain_fleet::{ContractOutcome, NetworkOverview};
use skychain_store::{Page, PageRequest, TransactionFilter};

use super::{parse_param, run};
use crate::error::ApiResult;
use crate::state::AppState;

/// Ledger listings page by 20
const TRANSACTIONS_PER_PAGE: u32 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    page: Option<u32>,
    limit: Option<u32>,
    #[serde(rename = "type")]
    kind: Option<String>,
    status: Option<String>,
}

pub async fn network_stats(State(state): State<Arc<AppState>>) -> ApiResult<Json<NetworkOverview>> {
    run(&state, |svc| svc.network_overview()).await.map(Json)
}

pub async fn transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransactionQuery>,
) -> ApiResult<Json<Page<LedgerTransaction>>> {
    let filter = TransactionFilter {
        kind: parse_param("type", query.kind.as_deref(), TransactionType::parse)?,
        status: parse_param("status", query.status.as_deref(), TransactionStatus::parse)?,
    };
    let page = PageRequest::new(query.page, query.limit, TRANSACTIONS_PER_PAGE);
    run(&state, move |svc| svc.list_transactions(&filter, page)).await.map(Json)
}

pub async fn transaction(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> ApiResult<Json<LedgerTransaction>> {
    run(&state, move |svc| svc.get_transaction(&hash)).await.map(Json)
}

pub async fn execute_contract(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ContractRequest>, JsonRejection>,
) -> ApiResult<Json<ContractOutcome>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.execute_contract(&request)).await.map(Json)
}

pub async fn verify_signature(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VerifySignatureRequest>, JsonRejection>,
) -> ApiResult<Json<SignatureCheck>> {
    let Json(request) = body?;
    run(&state, move |svc| svc.verify_signature(&request)).await.map(Json)
}

/// An unknown entity type has no records rather than being an error
pub async fn entity_transactions(
    State(state): State<Arc<AppState>>,
    Path((entity_type, entity_id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<LedgerTransaction>>> {
    let Some(entity_type) = EntityType::parse(&entity_type) else {
        return Ok(Json(Vec::new()));
    };
    run(&state, move |svc| svc.entity_transactions(entity_type, &entity_id))
        .await
        .map(Json)
}
