use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Field name -> list of messages, rendered as-is in 400 responses.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub fn field_error(errs: &mut FieldErrors, field: &str, msg: &str) {
    errs.entry(field.to_string()).or_default().push(msg.to_string());
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Configuration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Configuration(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation(errs) => json!(errs),
            AppError::Authentication(msg) => json!({ "detail": msg }),
            AppError::BadRequest(msg) | AppError::Configuration(msg) => json!({ "error": msg }),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                json!({ "error": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
