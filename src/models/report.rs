// src/models/report.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// --- RELATÓRIO FINANCEIRO (CSV) ---

// Uma linha da planilha financeira
#[derive(Debug, Clone, Serialize)]
pub struct FinanceReportRow {
    pub date: NaiveDate,
    pub kind: String,
    pub concept: String,
    pub amount: Decimal,
}

// Totais computados junto com as linhas
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

// --- RELATÓRIO DE MEMBROS (CSV) ---

#[derive(Debug, Clone, Serialize)]
pub struct MembershipReportRow {
    pub full_name: String,
    pub phone: String,
    pub plan_name: String,
    pub inscription_date: NaiveDate,
    pub due_date: NaiveDate,
    pub monthly_fee: Decimal,
    // Flag persistida (active/inactive) e status calculado, lado a lado
    pub lifecycle: &'static str,
    pub status: &'static str,
}

// --- DASHBOARD ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    // Mês corrente
    pub month_income: Decimal,
    pub month_expense: Decimal,
    pub month_net: Decimal,

    // Contagem de clientes ativos por status calculado
    pub active_customers: i64,
    pub due_today: i64,
    pub due_tomorrow: i64,
    pub overdue: i64,
}
