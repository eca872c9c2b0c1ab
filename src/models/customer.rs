// src/models/customer.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::membership::MembershipStatus;

// --- ENUMS ---

// Flag de ciclo de vida PERSISTIDA (active/inactive). Não confundir com o
// MembershipStatus calculado, que nunca vai para o banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "customer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
        }
    }
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[schema(example = "+5511999990000")]
    pub phone: String,

    // Texto livre: o parse para Plan é fail-open (desconhecido = Monthly)
    #[schema(example = "Monthly")]
    pub plan_name: String,

    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    pub inscription_date: NaiveDate,

    // Derivada de inscription_date + plano, salvo override manual
    #[schema(value_type = String, format = Date, example = "2024-02-15")]
    pub due_date: NaiveDate,

    #[schema(example = "89.90")]
    pub monthly_fee: Decimal,

    pub status: CustomerStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Cliente anotado com o status calculado no momento da leitura
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerWithStatus {
    #[serde(flatten)]
    pub customer: Customer,

    pub calculated_status: MembershipStatus,
}
