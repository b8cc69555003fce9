use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// Store reachability and ledger continuity
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let service = Arc::clone(&state.service);
    let database = tokio::task::spawn_blocking(move || {
        service.store().read(|tx| tx.transaction_count()).is_ok()
    })
    .await
    .unwrap_or(false);
    let ledger = state.service.ledger_health();

    let status = match (database, ledger.is_ok()) {
        (true, true) => "OK",
        (true, false) => "DEGRADED",
        (false, _) => "UNAVAILABLE",
    };
    let code = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(json!({
            "status": status,
            "timestamp": state.service.now().to_rfc3339(),
            "database": if database { "Connected" } else { "Disconnected" },
            "ledger": ledger,
        })),
    )
}
