// src/services/reminder_service.rs
//
// A lógica do lembrete automático. O agendador em si é colaborador externo:
// aqui só existe a checagem que ele invoca (e que o main liga num interval).

use chrono::NaiveDate;

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    models::customer::Customer,
    services::membership::{classify, today_local, MembershipStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueCheck {
    pub due_today: usize,
    pub due_tomorrow: usize,
    pub overdue: usize,
}

#[derive(Clone)]
pub struct ReminderService {
    customer_repo: CustomerRepository,
}

impl ReminderService {
    pub fn new(customer_repo: CustomerRepository) -> Self {
        Self { customer_repo }
    }

    /// Classifica os clientes ativos contra o dia corrente e loga o resumo
    pub async fn due_check(&self) -> Result<DueCheck, AppError> {
        let customers = self.customer_repo.list_active_customers().await?;
        let check = summarize_due(&customers, today_local());

        tracing::info!(
            "⏰ Lembrete automático: {} vencem hoje, {} vencem amanhã, {} em atraso",
            check.due_today,
            check.due_tomorrow,
            check.overdue
        );

        Ok(check)
    }
}

fn summarize_due(customers: &[Customer], today: NaiveDate) -> DueCheck {
    let mut check = DueCheck { due_today: 0, due_tomorrow: 0, overdue: 0 };

    for customer in customers {
        match classify(customer.due_date, today) {
            MembershipStatus::DueToday => check.due_today += 1,
            MembershipStatus::DueTomorrow => check.due_tomorrow += 1,
            MembershipStatus::Overdue => check.overdue += 1,
            MembershipStatus::Active => {}
        }
    }

    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::CustomerStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn customer(due_date: &str) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            full_name: "João Souza".to_string(),
            phone: "+5511988880000".to_string(),
            plan_name: "Monthly".to_string(),
            inscription_date: d("2024-01-15"),
            due_date: d(due_date),
            monthly_fee: Decimal::new(8990, 2),
            status: CustomerStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn summarize_counts_each_bucket() {
        let today = d("2024-06-10");
        let customers = vec![
            customer("2024-06-10"),
            customer("2024-06-10"),
            customer("2024-06-11"),
            customer("2024-05-30"),
            customer("2024-09-01"),
        ];

        let check = summarize_due(&customers, today);

        assert_eq!(check, DueCheck { due_today: 2, due_tomorrow: 1, overdue: 1 });
    }

    #[test]
    fn summarize_of_empty_list_is_all_zeros() {
        let check = summarize_due(&[], d("2024-06-10"));
        assert_eq!(check, DueCheck { due_today: 0, due_tomorrow: 0, overdue: 0 });
    }
}
