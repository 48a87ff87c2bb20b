use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use common::error::{AppError, FieldError};
use common::pagination::{Pagination, Paginator};
use common::types::{Currency, TransactionStatus, TransactionType, WalletStatus};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::response::{ApiResponse, TransactionResponse, WalletResponse};
use crate::domain::repository::WalletFilter;
use crate::use_cases::create_wallet::{CreateWalletInput, CreateWalletUseCase};
use crate::use_cases::get_wallet::GetWalletUseCase;
use crate::use_cases::get_wallet_with_balance::GetWalletWithBalanceUseCase;
use crate::use_cases::list_wallets::ListWalletsUseCase;
use crate::use_cases::update_wallet_status::UpdateWalletStatusUseCase;

use transaction_service::domain::repository::TransactionFilter;
use transaction_service::use_cases::create_transaction::{CreateTransactionInput, CreateTransactionUseCase};
use transaction_service::use_cases::get_transaction::GetTransactionUseCase;
use transaction_service::use_cases::list_transactions::ListTransactionsUseCase;
use transaction_service::use_cases::update_transaction_status::UpdateTransactionStatusUseCase;

pub struct AppState {
    pub create_wallet: CreateWalletUseCase,
    pub get_wallet: GetWalletUseCase,
    pub list_wallets: ListWalletsUseCase,
    pub update_wallet_status: UpdateWalletStatusUseCase,
    pub get_wallet_with_balance: GetWalletWithBalanceUseCase,
    pub create_transaction: CreateTransactionUseCase,
    pub get_transaction: GetTransactionUseCase,
    pub list_transactions: ListTransactionsUseCase,
    pub update_transaction_status: UpdateTransactionStatusUseCase,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/wallets", get(list_wallets).post(create_wallet))
        .route("/api/v1/wallets/{id}", get(get_wallet))
        .route("/api/v1/wallets/{id}/status", patch(update_wallet_status))
        .route("/api/v1/wallets/{id}/balance", get(get_wallet_with_balance))
        .route("/api/v1/transactions", get(list_transactions).post(create_transaction))
        .route("/api/v1/transactions/{id}", get(get_transaction))
        .route("/api/v1/transactions/{id}/status", patch(update_transaction_status))
        .with_state(state)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    pub owner_id: String,
    pub currency: String,
}

#[utoipa::path(post, path = "/api/v1/wallets", request_body = CreateWalletRequest,
    responses((status = 201, body = ApiResponse<WalletResponse>)))]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WalletResponse>>), AppError> {
    let wallet = state
        .create_wallet
        .execute(CreateWalletInput {
            owner_id: body.owner_id,
            currency: body.currency,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(WalletResponse::from(&wallet)))))
}

#[utoipa::path(get, path = "/api/v1/wallets/{id}",
    responses((status = 200, body = ApiResponse<WalletResponse>)))]
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WalletResponse>>, AppError> {
    let wallet = state.get_wallet.execute(&id).await?;
    Ok(Json(ApiResponse::success(WalletResponse::from(&wallet))))
}

#[utoipa::path(get, path = "/api/v1/wallets/{id}/balance",
    responses((status = 200, body = ApiResponse<WalletResponse>)))]
pub async fn get_wallet_with_balance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WalletResponse>>, AppError> {
    let wallet = state.get_wallet_with_balance.execute(&id).await?;
    Ok(Json(ApiResponse::success(WalletResponse::from(&wallet))))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WalletListQuery {
    pub owner_id: Option<String>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[utoipa::path(get, path = "/api/v1/wallets", params(WalletListQuery),
    responses((status = 200, body = ApiResponse<Vec<WalletResponse>>)))]
pub async fn list_wallets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WalletListQuery>,
) -> Result<Json<ApiResponse<ListPayload<WalletResponse>>>, AppError> {
    let paginator = Paginator {
        page: query.page,
        per_page: query.per_page,
    };
    paginator.validate().map_err(|e| AppError::Validation(vec![FieldError::new("per_page", e)]))?;

    let mut filter = WalletFilter::default();
    if let Some(owner_id) = query.owner_id {
        filter.owner_ids.push(owner_id);
    }
    if let Some(currency) = query.currency {
        let currency = parse_enum::<Currency>(&currency, "currency")?;
        filter.currencies.push(currency);
    }
    if let Some(status) = query.status {
        let status = parse_enum::<WalletStatus>(&status, "status")?;
        filter.statuses.push(status);
    }

    let (rows, pagination) = state.list_wallets.execute(filter, paginator).await?;
    let data = rows.iter().map(WalletResponse::from).collect();

    Ok(Json(ApiResponse::success(ListPayload { items: data, pagination })))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateWalletStatusRequest {
    pub status: String,
}

#[utoipa::path(patch, path = "/api/v1/wallets/{id}/status", request_body = UpdateWalletStatusRequest,
    responses((status = 200, body = ApiResponse<WalletResponse>)))]
pub async fn update_wallet_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateWalletStatusRequest>,
) -> Result<Json<ApiResponse<WalletResponse>>, AppError> {
    let status = parse_enum::<WalletStatus>(&body.status, "status")?;
    let wallet = state.update_wallet_status.execute(&id, status).await?;
    Ok(Json(ApiResponse::success(WalletResponse::from(&wallet))))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    pub wallet_id: String,
    pub amount: i64,
    pub note: Option<String>,
    pub transaction_type: String,
    pub idempotency_key: String,
}

#[utoipa::path(post, path = "/api/v1/transactions", request_body = CreateTransactionRequest,
    responses((status = 201, body = ApiResponse<TransactionResponse>)))]
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), AppError> {
    let transaction_type = parse_enum::<TransactionType>(&body.transaction_type, "transaction_type")?;

    let transaction = state
        .create_transaction
        .execute(CreateTransactionInput {
            wallet_id: body.wallet_id,
            amount: body.amount,
            note: body.note,
            transaction_type,
            idempotency_key: body.idempotency_key,
        })
        .await
        .map_err(AppError::from)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(TransactionResponse::from(&transaction)))))
}

#[utoipa::path(get, path = "/api/v1/transactions/{id}",
    responses((status = 200, body = ApiResponse<TransactionResponse>)))]
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TransactionResponse>>, AppError> {
    let transaction = state.get_transaction.execute(&id).await.map_err(AppError::from)?;
    Ok(Json(ApiResponse::success(TransactionResponse::from(&transaction))))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionListQuery {
    pub wallet_id: Option<String>,
    pub status: Option<String>,
    pub transaction_type: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[utoipa::path(get, path = "/api/v1/transactions", params(TransactionListQuery),
    responses((status = 200, body = ApiResponse<Vec<TransactionResponse>>)))]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<ApiResponse<ListPayload<TransactionResponse>>>, AppError> {
    let paginator = Paginator {
        page: query.page,
        per_page: query.per_page,
    };
    paginator.validate().map_err(|e| AppError::Validation(vec![FieldError::new("per_page", e)]))?;

    let mut filter = TransactionFilter::default();
    if let Some(wallet_id) = query.wallet_id {
        filter.wallet_ids.push(wallet_id);
    }
    if let Some(status) = query.status {
        let status = parse_enum::<TransactionStatus>(&status, "status")?;
        filter.statuses.push(status);
    }
    if let Some(transaction_type) = query.transaction_type {
        let transaction_type = parse_enum::<TransactionType>(&transaction_type, "transaction_type")?;
        filter.types.push(transaction_type);
    }

    let (rows, pagination) = state
        .list_transactions
        .execute(filter, paginator)
        .await
        .map_err(AppError::from)?;
    let data = rows.iter().map(TransactionResponse::from).collect();

    Ok(Json(ApiResponse::success(ListPayload { items: data, pagination })))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTransactionStatusRequest {
    pub status: String,
}

#[utoipa::path(patch, path = "/api/v1/transactions/{id}/status", request_body = UpdateTransactionStatusRequest,
    responses((status = 200, body = ApiResponse<TransactionResponse>)))]
pub async fn update_transaction_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTransactionStatusRequest>,
) -> Result<Json<ApiResponse<TransactionResponse>>, AppError> {
    let status = parse_enum::<TransactionStatus>(&body.status, "status")?;
    let transaction = state
        .update_transaction_status
        .execute(&id, status)
        .await
        .map_err(AppError::from)?;

    Ok(Json(ApiResponse::success(TransactionResponse::from(&transaction))))
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct ListPayload<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

fn parse_enum<T: FromStr<Err = String>>(raw: &str, field: &str) -> Result<T, AppError> {
    raw.parse().map_err(|e: String| AppError::Validation(vec![FieldError::new(field, e)]))
}
