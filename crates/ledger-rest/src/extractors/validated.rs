//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes the body and runs `validator` rules on it.
//! Malformed JSON and rule violations are both answered with an
//! `INVALID_PARAMETER` envelope; violations carry field-level details.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use ledger_core::{field_errors, validation_errors_to_ledger_error, ErrorResponse, LedgerError};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// JSON extractor that validates the deserialized value.
///
/// ```ignore
/// async fn create(ValidatedJson(request): ValidatedJson<TransactionEditRequest>) {
///     // request passed every field rule
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection for a body that is not valid JSON for `T`.
pub fn json_rejection(rejection: &JsonRejection) -> AppError {
    AppError::from(LedgerError::invalid_parameter(format!(
        "Invalid JSON: {}",
        rejection.body_text()
    )))
}

/// Rejection for a body that breaks field rules.
pub fn validation_rejection(errors: ValidationErrors) -> AppError {
    let details = field_errors(&errors);
    let error = validation_errors_to_ledger_error(errors);
    let response = ErrorResponse::from_error(&error).with_details(details);
    AppError::with_response(error, response)
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| json_rejection(&rejection))?;

        value.validate().map_err(validation_rejection)?;

        Ok(ValidatedJson(value))
    }
}
