// src/services/customer_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, TransactionRepository},
    models::{
        customer::{Customer, CustomerStatus, CustomerWithStatus},
        transaction::TransactionKind,
    },
    services::membership::{classify, compute_due_date, today_local, DueDateStrategy, Plan},
};

#[derive(Clone)]
pub struct CustomerService {
    customer_repo: CustomerRepository,
    transaction_repo: TransactionRepository,
    strategy: DueDateStrategy,
    pool: PgPool,
}

impl CustomerService {
    pub fn new(
        customer_repo: CustomerRepository,
        transaction_repo: TransactionRepository,
        strategy: DueDateStrategy,
        pool: PgPool,
    ) -> Self {
        Self { customer_repo, transaction_repo, strategy, pool }
    }

    /// Cria o cliente com o vencimento derivado do plano (ou do override)
    pub async fn create_customer(
        &self,
        full_name: &str,
        phone: &str,
        plan_name: &str,
        inscription_date: NaiveDate,
        monthly_fee: Decimal,
        due_date_override: Option<NaiveDate>,
    ) -> Result<Customer, AppError> {
        let due_date =
            compute_due_date(self.strategy, plan_name, inscription_date, due_date_override);

        self.customer_repo
            .create_customer(full_name, phone, plan_name, inscription_date, due_date, monthly_fee)
            .await
    }

    /// Lista anotando cada cliente com o status calculado AGORA.
    /// O status nunca é persistido: derivar na leitura garante resposta
    /// coerente com o dia corrente, não com o dia da última escrita.
    pub async fn list_customers(&self) -> Result<Vec<CustomerWithStatus>, AppError> {
        let today = today_local();

        let customers = self.customer_repo.list_customers().await?;

        let result = customers
            .into_iter()
            .map(|customer| CustomerWithStatus {
                calculated_status: classify(customer.due_date, today),
                customer,
            })
            .collect();

        Ok(result)
    }

    /// Marca como inativo sem tocar no vencimento
    pub async fn inactivate(&self, id: Uuid) -> Result<Customer, AppError> {
        self.customer_repo.set_status(id, CustomerStatus::Inactive).await
    }

    /// Renovação de matrícula: recalcula o vencimento, reativa o cliente e
    /// lança a mensalidade como entrada de caixa, tudo na mesma transação.
    pub async fn renew(
        &self,
        id: Uuid,
        inscription_date: NaiveDate,
        due_date_override: Option<NaiveDate>,
    ) -> Result<CustomerWithStatus, AppError> {
        // Precisamos do plano atual antes de calcular o novo vencimento
        let existing = self
            .customer_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let due_date = compute_due_date(
            self.strategy,
            &existing.plan_name,
            inscription_date,
            due_date_override,
        );

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        let customer = self
            .customer_repo
            .renew(&mut *tx, id, inscription_date, due_date)
            .await?;

        let plan = Plan::from_name(&customer.plan_name);
        let concept = format!("Renovação de matrícula ({:?})", plan);

        // Se falhar aqui, a renovação acima sofre rollback junto
        self.transaction_repo
            .create_transaction(
                &mut *tx,
                TransactionKind::Income,
                customer.monthly_fee,
                &concept,
                inscription_date,
                Some(customer.id),
            )
            .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!("💪 Cliente {} renovado até {}", customer.full_name, customer.due_date);

        Ok(CustomerWithStatus {
            calculated_status: classify(customer.due_date, today_local()),
            customer,
        })
    }
}
