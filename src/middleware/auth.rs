// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{User, UserRole},
};

// Valida o Bearer token e injeta o usuário nos "extensions" da requisição
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let user = app_state.auth_service.validate_token(token).await?;

            request.extensions_mut().insert(user);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Roda DEPOIS do auth_guard: exige que o usuário injetado seja admin
pub async fn admin_guard(
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .ok_or(AppError::InvalidToken)?;

    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
