//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use callscope_blocklist::BlocklistError;
use callscope_ledger::LedgerError;
use callscope_store::StoreError;

/// API-surface error. Core failures are mapped onto one of these before a
/// handler returns, so every error leaves as the same JSON body shape.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::CallNotFound(id) => ApiError::NotFound(format!("call {id} not found")),
            LedgerError::Validation(message) => ApiError::BadRequest(message),
            LedgerError::Store(err) => err.into(),
        }
    }
}

impl From<BlocklistError> for ApiError {
    fn from(err: BlocklistError) -> Self {
        match err {
            BlocklistError::Validation(message) => ApiError::BadRequest(message),
            BlocklistError::Store(err) => err.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Backend(message) => ApiError::Internal(message),
        }
    }
}
