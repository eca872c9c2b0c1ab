use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Username já existe")]
    UsernameAlreadyExists,

    #[error("Telefone já cadastrado")]
    PhoneAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso restrito a administradores")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    #[error("Transação não encontrada")]
    TransactionNotFound,

    #[error("Token de redefinição inválido ou expirado")]
    InvalidResetToken,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::UsernameAlreadyExists => {
                (StatusCode::CONFLICT, "Este username já está em uso.")
            }
            AppError::PhoneAlreadyExists => {
                (StatusCode::CONFLICT, "Este telefone já está cadastrado.")
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Username ou senha inválidos.")
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Apenas administradores podem executar esta ação.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::CustomerNotFound => (StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::TransactionNotFound => (StatusCode::NOT_FOUND, "Transação não encontrada."),
            AppError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "Token de redefinição inválido ou expirado.",
            ),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
