// src/db/customer_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::customer::{Customer, CustomerStatus},
};

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cria um cliente já com o vencimento calculado pelo serviço
    pub async fn create_customer(
        &self,
        full_name: &str,
        phone: &str,
        plan_name: &str,
        inscription_date: NaiveDate,
        due_date: NaiveDate,
        monthly_fee: Decimal,
    ) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                full_name, phone, plan_name, inscription_date, due_date, monthly_fee, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'active')
            RETURNING *
            "#,
        )
        .bind(full_name)
        .bind(phone)
        .bind(plan_name)
        .bind(inscription_date)
        .bind(due_date)
        .bind(monthly_fee)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Telefone é UNIQUE no banco: violação vira 409
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::PhoneAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Lista todos os clientes ordenados pelo vencimento mais próximo
    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            ORDER BY due_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Apenas os ativos (para relatórios e lembretes)
    pub async fn list_active_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE status = 'active'
            ORDER BY due_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Troca o flag de ciclo de vida sem mexer no vencimento
    pub async fn set_status(
        &self,
        id: Uuid,
        status: CustomerStatus,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        customer.ok_or(AppError::CustomerNotFound)
    }

    /// Renovação: nova inscrição, novo vencimento e reativação.
    /// Recebe o executor porque roda na mesma transação que o lançamento
    /// de caixa da mensalidade.
    pub async fn renew<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        inscription_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET inscription_date = $1,
                due_date = $2,
                status = 'active',
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(inscription_date)
        .bind(due_date)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        customer.ok_or(AppError::CustomerNotFound)
    }
}
