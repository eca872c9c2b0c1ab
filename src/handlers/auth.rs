// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AuthResponse, ForgotPasswordPayload, LoginUserPayload, MessageResponse,
        RegisterUserPayload, ResetPasswordPayload, User,
    },
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 200, description = "Usuário registrado, token emitido", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Username já existe")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .register_user(&payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado, token emitido", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// POST /api/auth/forgot-password
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Resposta genérica, exista o usuário ou não", body = MessageResponse)
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    app_state.auth_service.forgot_password(&payload.username).await?;

    // Mesma resposta para username existente ou não
    Ok(Json(MessageResponse {
        message: "Se o usuário existir, um token de redefinição foi gerado.".to_string(),
    }))
}

// POST /api/auth/reset-password
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = MessageResponse),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    payload.validate()?;

    app_state
        .auth_service
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok(Json(MessageResponse { message: "Senha redefinida com sucesso.".to_string() }))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Token inválido ou ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    (StatusCode::OK, Json(user))
}
