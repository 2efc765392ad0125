//! Error types for deploydash

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use openapi_server::models::ErrorResponse;
use thiserror::Error;
use tracing::error;

/// Main error type for deploydash
#[derive(Error, Debug)]
pub enum DashError {
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl DashError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashError::HttpError(_) => StatusCode::BAD_GATEWAY,
            DashError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            DashError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            DashError::JsonError(_) => "json",
            DashError::HttpError(_) => "upstream",
            DashError::ConfigError(_) => "config",
            DashError::Api { .. } => "api",
            DashError::ServerError(_) => "server",
            DashError::ValidationError(_) => "validation",
        }
    }
}

impl IntoResponse for DashError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            details: None,
        };
        (status, Json(body)).into_response()
    }
}
