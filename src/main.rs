//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::{AppState, Settings};
use crate::middleware::auth::{admin_guard, auth_guard};

// Intervalo entre as rodadas do lembrete automático
const REMINDER_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Toda a configuração é lida UMA vez aqui e viaja dentro do AppState
    let settings = Settings::from_env().expect("Falha ao carregar a configuração do ambiente.");
    let port = settings.port;

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new(settings)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    tracing::info!(
        "📋 Perfil de vencimento ativo: {:?}",
        app_state.settings.due_date_strategy
    );

    // O agendador de verdade é externo; aqui só deixamos a checagem rodando
    // num interval para o lembrete não depender de ninguém em dev.
    let reminder_service = app_state.reminder_service.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(REMINDER_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            if let Err(e) = reminder_service.due_check().await {
                tracing::error!("🔥 Falha na checagem de lembretes: {}", e);
            }
        }
    });

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Leituras exigem login; mutações exigem admin (guard extra por rota)
    let customer_routes = Router::new()
        .route(
            "/",
            post(handlers::customers::create_customer)
                .layer(axum_middleware::from_fn(admin_guard))
                .get(handlers::customers::list_customers),
        )
        .route(
            "/{id}/inactivate",
            put(handlers::customers::inactivate_customer)
                .layer(axum_middleware::from_fn(admin_guard)),
        )
        .route(
            "/{id}/renew",
            put(handlers::customers::renew_customer)
                .layer(axum_middleware::from_fn(admin_guard)),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let transaction_routes = Router::new()
        .route(
            "/",
            post(handlers::transactions::create_transaction)
                .layer(axum_middleware::from_fn(admin_guard))
                .get(handlers::transactions::list_transactions),
        )
        .route(
            "/{id}/receipt",
            get(handlers::transactions::transaction_receipt),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let report_routes = Router::new()
        .route("/finance", get(handlers::reports::finance_report))
        .route("/memberships", get(handlers::reports::membership_report))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::reports::dashboard_summary))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/transactions", transaction_routes)
        .nest("/api/reports", report_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
