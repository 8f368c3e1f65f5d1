//! Error taxonomy shared by every layer of the ledger.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the ledger.
///
/// Each variant maps to one classified failure kind (see [`LedgerError::error_code`])
/// and a stable numeric code (see [`LedgerError::numeric_code`]) that API clients
/// switch on.
#[derive(Error, Debug)]
pub enum LedgerError {
    // ============ Workflow Errors ============
    /// No record with the given business identifier.
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// A record with the given business identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The store accepted the insert but reported zero affected rows.
    #[error("Create failed: {0}")]
    CreateFailed(String),

    /// The store accepted the update but reported zero affected rows.
    #[error("Update failed: {0}")]
    UpdateFailed(String),

    /// The record was found but the delete affected zero rows.
    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    /// Malformed input.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Redis/Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LedgerError {
    /// Numeric code for a successful call, carried in API envelopes.
    pub const SUCCESS_CODE: i32 = 0;

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::AlreadyExists(_) => 409,
            Self::InvalidParameter(_) => 400,
            Self::CreateFailed(_)
            | Self::UpdateFailed(_)
            | Self::DeleteFailed(_)
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns the machine-readable failure kind.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::CreateFailed(_) => "CREATE_FAILED",
            Self::UpdateFailed(_) => "UPDATE_FAILED",
            Self::DeleteFailed(_) => "DELETE_FAILED",
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => "SYSTEM_ERROR",
        }
    }

    /// Returns the numeric error code exposed to API clients.
    #[must_use]
    pub const fn numeric_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => -101,
            Self::AlreadyExists(_) => -102,
            Self::CreateFailed(_) => -103,
            Self::UpdateFailed(_) => -104,
            Self::DeleteFailed(_) => -105,
            Self::InvalidParameter(_) => -2,
            Self::Database(_)
            | Self::Configuration(_)
            | Self::Cache(_)
            | Self::Internal(_)
            | Self::Other(_) => -1,
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates an already-exists error.
    #[must_use]
    pub fn already_exists<T: Into<String>>(message: T) -> Self {
        Self::AlreadyExists(message.into())
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter<T: Into<String>>(message: T) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error is a classified workflow outcome rather than a system fault.
    #[must_use]
    pub const fn is_business(&self) -> bool {
        !matches!(self.numeric_code(), -1)
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return Self::AlreadyExists(db_err.message().to_string());
                }
                if let Some(code) = db_err.code() {
                    if code == "23505" || code == "1062" {
                        return Self::AlreadyExists(db_err.message().to_string());
                    }
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {err}"))
    }
}

/// Serializable error payload for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `LedgerError`.
    #[must_use]
    pub fn from_error(error: &LedgerError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&LedgerError> for ErrorResponse {
    fn from(error: &LedgerError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(LedgerError::not_found("Transaction", "TXN1").status_code(), 404);
        assert_eq!(LedgerError::already_exists("dup").status_code(), 409);
        assert_eq!(LedgerError::invalid_parameter("amount").status_code(), 400);
        assert_eq!(LedgerError::CreateFailed("x".to_string()).status_code(), 500);
        assert_eq!(LedgerError::Database("db".to_string()).status_code(), 500);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(LedgerError::not_found("Transaction", 1).error_code(), "NOT_FOUND");
        assert_eq!(LedgerError::already_exists("dup").error_code(), "ALREADY_EXISTS");
        assert_eq!(LedgerError::CreateFailed("x".to_string()).error_code(), "CREATE_FAILED");
        assert_eq!(LedgerError::UpdateFailed("x".to_string()).error_code(), "UPDATE_FAILED");
        assert_eq!(LedgerError::DeleteFailed("x".to_string()).error_code(), "DELETE_FAILED");
        assert_eq!(LedgerError::invalid_parameter("x").error_code(), "INVALID_PARAMETER");
        assert_eq!(LedgerError::Cache("x".to_string()).error_code(), "SYSTEM_ERROR");
        assert_eq!(LedgerError::internal("x").error_code(), "SYSTEM_ERROR");
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(LedgerError::not_found("Transaction", 1).numeric_code(), -101);
        assert_eq!(LedgerError::already_exists("dup").numeric_code(), -102);
        assert_eq!(LedgerError::CreateFailed(String::new()).numeric_code(), -103);
        assert_eq!(LedgerError::UpdateFailed(String::new()).numeric_code(), -104);
        assert_eq!(LedgerError::DeleteFailed(String::new()).numeric_code(), -105);
        assert_eq!(LedgerError::invalid_parameter("x").numeric_code(), -2);
        assert_eq!(LedgerError::Database(String::new()).numeric_code(), -1);
        assert_eq!(
            LedgerError::Other(anyhow::anyhow!("boom")).numeric_code(),
            -1
        );
    }

    #[test]
    fn test_business_errors() {
        assert!(LedgerError::not_found("Transaction", 1).is_business());
        assert!(LedgerError::already_exists("dup").is_business());
        assert!(!LedgerError::Database("lost".to_string()).is_business());
        assert!(!LedgerError::internal("oops").is_business());
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::not_found("Transaction", "TXN202401010001");
        assert_eq!(
            err.to_string(),
            "Resource not found: Transaction with id TXN202401010001"
        );
    }

    #[test]
    fn test_json_error_maps_to_internal() {
        let json_err = serde_json::from_str::<u64>("not a number").unwrap_err();
        let err = LedgerError::from(json_err);
        assert!(matches!(err, LedgerError::Internal(_)));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = LedgerError::already_exists("TXN1");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "ALREADY_EXISTS");
        assert!(response.message.contains("TXN1"));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = LedgerError::invalid_parameter("bad input");
        let details = vec![FieldError {
            field: "amount".to_string(),
            message: "must be positive".to_string(),
            code: "range".to_string(),
        }];
        let response = ErrorResponse::from(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
