// src/handlers/customers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
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
    models::customer::{Customer, CustomerWithStatus},
};

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[validate(length(min = 8, message = "O telefone deve ter no mínimo 8 caracteres."))]
    #[schema(example = "+5511999990000")]
    pub phone: String,

    // Ausente ou desconhecido cai no plano mensal (fail-open)
    #[serde(default)]
    #[schema(example = "Quarterly")]
    pub plan_name: Option<String>,

    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub inscription_date: NaiveDate,

    #[serde(default)]
    #[schema(example = "89.90")]
    pub monthly_fee: Decimal,

    // Override manual: pula a derivação por plano neste ciclo
    #[schema(value_type = Option<String>, format = Date, example = "2024-02-01")]
    pub due_date_override: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewCustomerPayload {
    #[schema(value_type = String, format = Date, example = "2024-02-15")]
    pub inscription_date: NaiveDate,

    #[schema(value_type = Option<String>, format = Date, example = "2024-03-01")]
    pub due_date_override: Option<NaiveDate>,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Telefone já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .create_customer(
            &payload.full_name,
            &payload.phone,
            payload.plan_name.as_deref().unwrap_or("Monthly"),
            payload.inscription_date,
            payload.monthly_fee,
            payload.due_date_override,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Clientes ordenados por vencimento, com status calculado", body = Vec<CustomerWithStatus>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.customer_service.list_customers().await?;

    Ok((StatusCode::OK, Json(customers)))
}

// PUT /api/customers/{id}/inactivate
#[utoipa::path(
    put,
    path = "/api/customers/{id}/inactivate",
    tag = "Customers",
    params(
        ("id" = Uuid, Path, description = "ID do cliente")
    ),
    responses(
        (status = 200, description = "Cliente marcado como inativo", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn inactivate_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.customer_service.inactivate(id).await?;

    Ok((StatusCode::OK, Json(customer)))
}

// PUT /api/customers/{id}/renew
#[utoipa::path(
    put,
    path = "/api/customers/{id}/renew",
    tag = "Customers",
    request_body = RenewCustomerPayload,
    params(
        ("id" = Uuid, Path, description = "ID do cliente")
    ),
    responses(
        (status = 200, description = "Cliente renovado e reativado", body = CustomerWithStatus),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn renew_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenewCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .customer_service
        .renew(id, payload.inscription_date, payload.due_date_override)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}
