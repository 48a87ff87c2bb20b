//! Unified HTTP-facing error type.
//!
//! The teacher keeps one `ApiError` per crate (`wallet_service::api::error`,
//! `transaction_service::api::error`); since both domains are now mounted on
//! one router (SPEC_FULL.md 0), `AppError` generalizes that pattern to a
//! single enum both crates convert their domain errors into.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// One entry of a validation failure, JSON-pointer-styled the way
/// `examples/original_source/internal/util/http/apierror` reports them.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub source: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            source: format!("/{field}"),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation error")]
    Validation(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("wallet is not active")]
    WalletNotActive,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("invalid status transition: {0}")]
    InvalidStatusTransition(String),

    #[error("could not acquire lock: {0}")]
    LockUnavailable(String),

    #[error("internal error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(Box::new(err))
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::WalletNotActive => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InsufficientFunds => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidStatusTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LockUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref err) = self {
            tracing::error!(error = %err, "internal error serving request");
        }

        let status = self.status();
        let (message, errors) = match self {
            AppError::Validation(errors) => ("validation error".to_string(), errors),
            AppError::Internal(_) => ("internal server error".to_string(), vec![]),
            other => (other.to_string(), vec![]),
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
            "errors": errors,
        }));

        (status, body).into_response()
    }
}
