// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::forgot_password,
        handlers::auth::reset_password,

        // --- Users ---
        handlers::auth::get_me,

        // --- Customers ---
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::inactivate_customer,
        handlers::customers::renew_customer,

        // --- Transactions ---
        handlers::transactions::create_transaction,
        handlers::transactions::list_transactions,
        handlers::transactions::transaction_receipt,

        // --- Reports ---
        handlers::reports::finance_report,
        handlers::reports::membership_report,
        handlers::reports::dashboard_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,
            models::auth::AuthResponse,
            models::auth::MessageResponse,

            // --- Customers ---
            models::customer::CustomerStatus,
            models::customer::Customer,
            models::customer::CustomerWithStatus,
            handlers::customers::CreateCustomerPayload,
            handlers::customers::RenewCustomerPayload,

            // --- Transactions ---
            models::transaction::TransactionKind,
            models::transaction::Transaction,
            handlers::transactions::CreateTransactionPayload,

            // --- Reports ---
            models::report::FinanceTotals,
            models::report::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Customers", description = "Gestão de Membros e Vencimentos"),
        (name = "Transactions", description = "Caixa: Entradas e Saídas"),
        (name = "Reports", description = "Relatórios e Planilhas"),
        (name = "Dashboard", description = "Indicadores Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
