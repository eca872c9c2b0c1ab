// src/handlers/transactions.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::transaction::{Transaction, TransactionKind},
};

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    pub kind: TransactionKind,

    #[schema(example = "150.00")]
    pub amount: Decimal,

    #[validate(length(min = 1, message = "O conceito é obrigatório."))]
    #[schema(example = "Compra de anilhas")]
    pub concept: String,

    #[schema(value_type = String, format = Date, example = "2024-01-20")]
    pub date: NaiveDate,

    // Referência fraca opcional ao cliente
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// POST /api/transactions
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    request_body = CreateTransactionPayload,
    responses(
        (status = 201, description = "Lançamento registrado (imutável a partir daqui)", body = Transaction),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let transaction = app_state
        .finance_service
        .record_transaction(
            payload.kind,
            payload.amount,
            &payload.concept,
            payload.date,
            payload.customer_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

// GET /api/transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    params(
        ("from" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (YYYY-MM-DD)"),
        ("kind" = Option<String>, Query, description = "Filtro por tipo: income ou expense")
    ),
    responses(
        (status = 200, description = "Lançamentos do período", body = Vec<Transaction>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = app_state
        .finance_service
        .list_transactions(query.from, query.to, query.kind)
        .await?;

    Ok((StatusCode::OK, Json(transactions)))
}

// GET /api/transactions/{id}/receipt
#[utoipa::path(
    get,
    path = "/api/transactions/{id}/receipt",
    tag = "Transactions",
    params(
        ("id" = Uuid, Path, description = "ID da transação")
    ),
    responses(
        (status = 200, description = "Recibo em PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn transaction_receipt(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pdf = app_state.report_service.receipt_pdf(id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf"),
        (
            header::CONTENT_DISPOSITION,
            "inline; filename=\"recibo.pdf\"",
        ),
    ];

    Ok((StatusCode::OK, headers, pdf))
}
