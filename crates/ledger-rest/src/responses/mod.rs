//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use ledger_core::{ErrorResponse, LedgerError};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

/// Message carried by every successful envelope.
pub const SUCCESS_MESSAGE: &str = "success";

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// `0` on success, the numeric error code otherwise.
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: LedgerError::SUCCESS_CODE,
            message: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates an error response.
    pub fn error(code: i32, error: ErrorResponse) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            code,
            message: error.message.clone(),
            data: None,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError {
    pub error: LedgerError,
    details: Option<ErrorResponse>,
}

impl AppError {
    /// Wraps an error whose payload already carries field-level details.
    pub fn with_response(error: LedgerError, response: ErrorResponse) -> Self {
        Self {
            error,
            details: Some(response),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(error: LedgerError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.error.is_business() {
            warn!(code = self.error.error_code(), "Request failed: {}", self.error);
        } else {
            error!("Request failed: {}", self.error);
        }

        let error_response = self
            .details
            .unwrap_or_else(|| ErrorResponse::from_error(&self.error));
        let body = Json(ApiResponse::<()>::error(
            self.error.numeric_code(),
            error_response,
        ));

        (status, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}
