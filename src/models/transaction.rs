// src/models/transaction.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Mapeia o CREATE TYPE transaction_kind do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,  // Entrada
    Expense, // Saída
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

// Lançamento de caixa. Criado uma vez, imutável depois: o repositório
// não expõe UPDATE nem DELETE.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,

    pub kind: TransactionKind,

    #[schema(example = "89.90")]
    pub amount: Decimal,

    #[schema(example = "Mensalidade Janeiro")]
    pub concept: String,

    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub date: NaiveDate,

    // Referência fraca: chave de consulta, não vínculo de posse
    pub customer_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}
