use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(DbError),
}

/// Database failures are mapped by meaning, not wholesale: a referenced
/// product is a conflict with a remediation hint, while everything else stays
/// a server-side storage error.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ProductReferenced(id) => AppError::Conflict(format!(
                "Product {id} is referenced by existing order items. \
                 Retry with ?cascade=true to remove them as well."
            )),
            other => AppError::Database(other),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Turns an `AppError` into the status code and `{"error": ...}` body the
/// dashboard expects.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (StatusCode::INTERNAL_SERVER_ERROR, db_err.to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
