// src/db/transaction_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::transaction::{Transaction, TransactionKind},
};

// Tabela append-only: este repositório não tem UPDATE nem DELETE de propósito.
#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recebe o executor porque a renovação grava o lançamento na mesma
    /// transação que atualiza o cliente. Fora dela, passe `&pool`.
    pub async fn create_transaction<'e, E>(
        &self,
        executor: E,
        kind: TransactionKind,
        amount: Decimal,
        concept: &str,
        date: NaiveDate,
        customer_id: Option<Uuid>,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (kind, amount, concept, date, customer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(kind)
        .bind(amount)
        .bind(concept)
        .bind(date)
        .bind(customer_id)
        .fetch_one(executor)
        .await?;

        Ok(transaction)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, AppError> {
        let transaction =
            sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(transaction)
    }

    /// Lista com filtros opcionais de período e tipo
    pub async fn list_transactions(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Transaction>, AppError> {
        // Filtros nulos viram "sem filtro" direto no SQL
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
              AND ($3::transaction_kind IS NULL OR kind = $3)
            ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Soma do período por tipo (COALESCE para nunca devolver NULL)
    pub async fn sum_in_period(
        &self,
        kind: TransactionKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE kind = $1 AND date >= $2 AND date <= $3
            "#,
        )
        .bind(kind)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
