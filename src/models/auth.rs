// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Staff,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: UserRole,

    // Fluxo de recuperação de senha: nulos fora de uma redefinição em andamento
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 3, message = "O username deve ter no mínimo 3 caracteres."))]
    #[schema(example = "recepcao")]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 3, message = "O username deve ter no mínimo 3 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Solicita um token de redefinição de senha
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordPayload {
    #[validate(length(min = 3, message = "O username deve ter no mínimo 3 caracteres."))]
    pub username: String,
}

// Consome o token e define a nova senha
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "O token é obrigatório."))]
    pub token: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Resposta genérica com mensagem (não revela se o username existe)
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // Subject (ID do usuário)
    pub role: UserRole, // Papel do usuário, para o guard de admin
    pub exp: usize,     // Expiration time (quando o token expira)
    pub iat: usize,     // Issued At (quando o token foi criado)
}
