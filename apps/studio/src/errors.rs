use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::client::ClientError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as a flat `{"error": "<message>"}` body, the shape
/// browser callers of the proxy routes already expect.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// A provider credential is not configured. Carries the variable name.
    #[error("{0} missing")]
    MissingCredential(&'static str),

    /// A local failure while proxying (malformed inbound body, transport error).
    #[error("{0}")]
    Proxy(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// A client wrapper call through the proxy failed.
    #[error("{0}")]
    Upstream(#[from] ClientError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a local proxy failure, falling back to `default` when the error has no message.
    pub fn proxy(err: impl std::fmt::Display, default: &str) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            AppError::Proxy(default.to_string())
        } else {
            AppError::Proxy(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MissingCredential(_) | AppError::Proxy(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::MissingCredential(key) => {
                tracing::error!("Proxy credential {key} is not configured");
                self.to_string()
            }
            AppError::Proxy(msg) => {
                tracing::error!("Proxy failure: {msg}");
                msg.clone()
            }
            AppError::Upstream(e) => {
                tracing::warn!("Generation call failed: {e}");
                e.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
