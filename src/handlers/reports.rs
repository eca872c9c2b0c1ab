// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{common::error::AppError, config::AppState, models::report::DashboardSummary};

#[derive(Debug, Deserialize)]
pub struct FinanceReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// GET /api/reports/finance
#[utoipa::path(
    get,
    path = "/api/reports/finance",
    tag = "Reports",
    params(
        ("from" = Option<String>, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Planilha CSV com lançamentos e totais", body = String, content_type = "text/csv")
    ),
    security(("api_jwt" = []))
)]
pub async fn finance_report(
    State(app_state): State<AppState>,
    Query(query): Query<FinanceReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let csv = app_state
        .report_service
        .finance_csv(query.from, query.to)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"relatorio_financeiro.csv\"",
        ),
    ];

    Ok((StatusCode::OK, headers, csv))
}

// GET /api/reports/memberships
#[utoipa::path(
    get,
    path = "/api/reports/memberships",
    tag = "Reports",
    responses(
        (status = 200, description = "Planilha CSV de membros com status calculado", body = String, content_type = "text/csv")
    ),
    security(("api_jwt" = []))
)]
pub async fn membership_report(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let csv = app_state.report_service.membership_csv().await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"relatorio_membros.csv\"",
        ),
    ];

    Ok((StatusCode::OK, headers, csv))
}

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo do mês corrente e contagens por status", body = DashboardSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard_summary(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.report_service.dashboard_summary().await?;

    Ok((StatusCode::OK, Json(summary)))
}
