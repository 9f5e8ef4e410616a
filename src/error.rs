/*
 * Responsibility
 * - Application-wide AppError definition
 * - IntoResponse implementation (HTTP status / JSON error body)
 * - Auth and upstream failures map to stable machine-readable codes
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::countries::client::UpstreamError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    // FORBIDDEN diagnostics: which scopes were needed vs. granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provided: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("insufficient permissions")]
    Forbidden {
        required: Vec<String>,
        provided: Vec<String>,
    },

    #[error("upstream request failed")]
    Upstream,

    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, required, provided) = match &self {
            AppError::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", None, None),
            AppError::Forbidden { required, provided } => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                Some(required.clone()),
                Some(provided.clone()),
            ),
            AppError::Upstream => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", None, None),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", None, None),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
                required,
                provided,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(_: ConfigError) -> Self {
        AppError::Internal
    }
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        // Details are logged at the client; the response stays generic so
        // upstream internals never reach the caller.
        tracing::warn!(error = %e, "upstream call failed");
        AppError::Upstream
    }
}
