//! OpenAPI documentation for the REST API.

use crate::controllers::HealthResponse;
use ledger_core::{ErrorResponse, FieldError};
use ledger_service::{
    TransactionDeleteRequest, TransactionEditRequest, TransactionPageResponse, TransactionResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the ledger API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledger API",
        version = "1.0.0",
        description = "Transaction ledger with post-commit cache invalidation",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::transaction_controller::list_transactions,
        crate::controllers::transaction_controller::get_transaction,
        crate::controllers::transaction_controller::create_transaction,
        crate::controllers::transaction_controller::update_transaction,
        crate::controllers::transaction_controller::delete_transaction,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            HealthResponse,
            TransactionEditRequest,
            TransactionDeleteRequest,
            TransactionResponse,
            TransactionPageResponse,
        )
    ),
    tags(
        (name = "transactions", description = "Transaction ledger endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
