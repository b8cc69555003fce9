//! HTTP error mapping
//!
//! Every failure leaves a handler as an [`ApiError`] and renders as
//! `{"error": ..., "details"?: [...]}`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use skychain_fleet::FleetError;
use tokio::task::JoinError;
use tracing::{error, warn};

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [String]>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<Vec<String>>,
    /// Logged, never sent
    cause: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    pub fn validation(details: Vec<String>) -> Self {
        Self {
            details: Some(details),
            ..Self::new(StatusCode::BAD_REQUEST, "Validation error")
        }
    }

    pub fn internal(cause: impl Into<String>, expose: bool) -> Self {
        let cause = cause.into();
        let message = if expose { cause.clone() } else { INTERNAL_MESSAGE.to_string() };
        Self {
            cause: Some(cause),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }

    /// Map a fleet error; `expose` controls whether internal detail is shown
    pub fn from_fleet(err: FleetError, expose: bool) -> Self {
        match err {
            FleetError::Validation(details) => Self::validation(details),
            FleetError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            FleetError::InvalidReference(message)
            | FleetError::DuplicateKey(message)
            | FleetError::OutOfRange(message) => Self::new(StatusCode::BAD_REQUEST, message),
            FleetError::Internal(cause) => Self::internal(cause, expose),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(vec![rejection.body_text()])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(vec![rejection.body_text()])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(vec![rejection.body_text()])
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        Self::internal(format!("Blocking task failed: {err}"), false)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                cause = self.cause.as_deref().unwrap_or(&self.message),
                "Request failed"
            );
        } else {
            warn!(
                status = self.status.as_u16(),
                error = %self.message,
                details = ?self.details,
                "Request rejected"
            );
        }

        let body = ErrorBody {
            error: &self.message,
            details: self.details.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
