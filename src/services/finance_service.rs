// src/services/finance_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TransactionRepository,
    models::transaction::{Transaction, TransactionKind},
};

#[derive(Clone)]
pub struct FinanceService {
    transaction_repo: TransactionRepository,
    pool: PgPool,
}

impl FinanceService {
    pub fn new(transaction_repo: TransactionRepository, pool: PgPool) -> Self {
        Self { transaction_repo, pool }
    }

    pub async fn record_transaction(
        &self,
        kind: TransactionKind,
        amount: Decimal,
        concept: &str,
        date: NaiveDate,
        customer_id: Option<Uuid>,
    ) -> Result<Transaction, AppError> {
        self.transaction_repo
            .create_transaction(&self.pool, kind, amount, concept, date, customer_id)
            .await
    }

    pub async fn list_transactions(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>, AppError> {
        self.transaction_repo.list_transactions(from, to, kind).await
    }
}
