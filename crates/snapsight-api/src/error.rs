//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. A user error renders as its own
//! status with `{ "errors": [...], "message": ... }`; anything else renders as 500 with
//! `{ "message": ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use snapsight_core::{AppError, ErrorMetadata, LogLevel};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub message: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from snapsight-core)
///
/// `is_production` comes from [`snapsight_core::Config`] via the application state and hides
/// internal messages from clients.
#[derive(Debug)]
pub struct HttpAppError {
    error: AppError,
    is_production: bool,
}

impl HttpAppError {
    pub fn new(error: AppError, is_production: bool) -> Self {
        Self {
            error,
            is_production,
        }
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                "Error occurred"
            );
        }
    }
}

impl HttpAppError {
    fn to_error_response(&self) -> ErrorResponse {
        let app_error = &self.error;
        match app_error {
            AppError::UserInvalid(inner) => ErrorResponse {
                errors: Some(inner.display_errors().to_vec()),
                message: inner.message().to_string(),
            },
            _ if self.is_production && app_error.is_sensitive() => ErrorResponse {
                errors: None,
                message: app_error.client_message(),
            },
            _ => ErrorResponse {
                errors: None,
                message: app_error.message().to_string(),
            },
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = Json(self.to_error_response());
        (status, body).into_response()
    }
}
