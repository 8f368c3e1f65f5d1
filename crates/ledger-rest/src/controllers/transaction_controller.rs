//! Transaction ledger controller.

use crate::{
    extractors::{PaginationQuery, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use ledger_core::{ErrorResponse, LedgerError, PageRequest};
use ledger_service::{
    TransactionDeleteRequest, TransactionEditRequest, TransactionPageResponse, TransactionResponse,
};
use tracing::debug;

/// Creates the transaction router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions))
        .route("/create", post(create_transaction))
        .route("/update", post(update_transaction))
        .route("/delete", post(delete_transaction))
        .route("/:transaction_id", get(get_transaction))
}

/// List transactions in insertion order.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    params(PaginationQuery),
    responses(
        (status = 200, description = "One page of transactions", body = ApiResponse<TransactionPageResponse>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<TransactionPageResponse> {
    let page = PageRequest::try_from(pagination)?;
    debug!("List transactions request, page: {}, size: {}", page.page, page.size);

    let response = state.transaction_service.list(page).await?;
    ok(response)
}

/// Get a transaction by its business identifier.
#[utoipa::path(
    get,
    path = "/transactions/{transaction_id}",
    tag = "transactions",
    params(("transaction_id" = String, Path, description = "Business identifier")),
    responses(
        (status = 200, description = "The transaction", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "No such transaction", body = ErrorResponse)
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<TransactionResponse> {
    debug!("Get transaction request: {}", transaction_id);

    let response = state.transaction_service.get_by_id(&transaction_id).await?;
    ok(response)
}

/// Create a transaction. The identifier is generated when absent.
#[utoipa::path(
    post,
    path = "/transactions/create",
    tag = "transactions",
    request_body = TransactionEditRequest,
    responses(
        (status = 201, description = "Transaction created", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Identifier already taken", body = ErrorResponse)
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TransactionEditRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), AppError> {
    debug!("Create transaction request: {:?}", request.transaction_id);

    let response = state.transaction_service.create(request).await?;
    Ok(created(response))
}

/// Overwrite a transaction named by `transactionId`.
#[utoipa::path(
    post,
    path = "/transactions/update",
    tag = "transactions",
    request_body = TransactionEditRequest,
    responses(
        (status = 200, description = "Transaction updated", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "No such transaction", body = ErrorResponse)
    )
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TransactionEditRequest>,
) -> ApiResult<TransactionResponse> {
    debug!("Update transaction request: {:?}", request.transaction_id);

    let response = state.transaction_service.update(request).await?;
    ok(response)
}

/// Delete a transaction.
#[utoipa::path(
    post,
    path = "/transactions/delete",
    tag = "transactions",
    request_body = TransactionDeleteRequest,
    responses(
        (status = 200, description = "Transaction deleted", body = ApiResponse<bool>),
        (status = 404, description = "No such transaction", body = ErrorResponse),
        (status = 500, description = "The store removed nothing", body = ErrorResponse)
    )
)]
pub async fn delete_transaction(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TransactionDeleteRequest>,
) -> ApiResult<bool> {
    debug!("Delete transaction request: {}", request.transaction_id);

    let deleted = state
        .transaction_service
        .delete(&request.transaction_id)
        .await?;
    if !deleted {
        return Err(LedgerError::DeleteFailed(request.transaction_id).into());
    }
    ok(true)
}
