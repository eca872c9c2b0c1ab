// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CustomerRepository, TransactionRepository, UserRepository},
    services::{
        auth::AuthService, customer_service::CustomerService, finance_service::FinanceService,
        membership::DueDateStrategy, reminder_service::ReminderService,
        report_service::ReportService,
    },
};

// Toda a configuração lida do ambiente, UMA vez, na subida.
// Nada de globals mutáveis: quem precisa de algo recebe daqui.
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub gym_name: String,
    pub due_date_strategy: DueDateStrategy,
    pub fonts_dir: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT inválida: '{}'", value))?,
            Err(_) => 3000,
        };

        let gym_name = env::var("GYM_NAME").unwrap_or_else(|_| "ACADEMIA".to_string());

        // Perfil de deploy: offset por plano (padrão) ou 30 dias corridos
        let due_date_strategy = match env::var("DUE_DATE_STRATEGY") {
            Ok(value) => DueDateStrategy::parse(&value)?,
            Err(_) => DueDateStrategy::default(),
        };

        let fonts_dir = env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string());

        Ok(Self { database_url, jwt_secret, port, gym_name, due_date_strategy, fonts_dir })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub auth_service: AuthService,
    pub customer_service: CustomerService,
    pub finance_service: FinanceService,
    pub report_service: ReportService,
    pub reminder_service: ReminderService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let transaction_repo = TransactionRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, settings.jwt_secret.clone());
        let customer_service = CustomerService::new(
            customer_repo.clone(),
            transaction_repo.clone(),
            settings.due_date_strategy,
            db_pool.clone(),
        );
        let finance_service = FinanceService::new(transaction_repo.clone(), db_pool.clone());
        let report_service = ReportService::new(
            customer_repo.clone(),
            transaction_repo,
            settings.gym_name.clone(),
            settings.fonts_dir.clone(),
        );
        let reminder_service = ReminderService::new(customer_repo);

        Ok(Self {
            db_pool,
            settings,
            auth_service,
            customer_service,
            finance_service,
            report_service,
            reminder_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_strategy_is_plan_offset() {
        assert_eq!(DueDateStrategy::default(), DueDateStrategy::PlanOffset);
    }
}
