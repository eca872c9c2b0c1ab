// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User, UserRole},
};

const TOKEN_LIFETIME_HOURS: i64 = 8;
const RESET_TOKEN_LIFETIME_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn register_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        // Hashing em thread separada para não travar o runtime
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // O registro aberto cria administradores; staff comum entra depois
        let new_user = self
            .user_repo
            .create_user(username, &hashed_password, UserRole::Admin)
            .await?;

        issue_token(&self.jwt_secret, &new_user)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        issue_token(&self.jwt_secret, &user)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Gera e grava um token de redefinição de uso único, com validade curta.
    /// Responde Ok mesmo para username inexistente: a rota não pode servir
    /// de oráculo de quais usuários existem.
    pub async fn forgot_password(&self, username: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repo.find_by_username(username).await? else {
            return Ok(());
        };

        let token = Uuid::new_v4().to_string();
        let expires = Utc::now() + Duration::minutes(RESET_TOKEN_LIFETIME_MINUTES);

        self.user_repo.set_reset_token(user.id, &token, expires).await?;

        tracing::info!("🔑 Token de redefinição gerado para o usuário {}", user.username);

        Ok(())
    }

    /// Consome o token (se válido e dentro da validade) e troca a senha
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_valid_reset_token(token)
            .await?
            .ok_or(AppError::InvalidResetToken)?;

        let password_clone = new_password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .update_password_and_clear_token(user.id, &hashed_password)
            .await?;

        tracing::info!("🔒 Senha redefinida para o usuário {}", user.username);

        Ok(())
    }
}

// Helpers livres: assinam/validam sem precisar do repositório,
// o que também permite testá-los sem banco.

pub fn issue_token(jwt_secret: &str, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(TOKEN_LIFETIME_HOURS);

    let claims = Claims {
        sub: user.id,
        role: user.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?)
}

pub fn decode_token(jwt_secret: &str, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            username: "recepcao".to_string(),
            password_hash: "irrelevante".to_string(),
            role,
            reset_token: None,
            reset_token_expires: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip_preserves_subject_and_role() {
        let user = sample_user(UserRole::Admin);
        let token = issue_token("segredo-de-teste", &user).unwrap();

        let claims = decode_token("segredo-de-teste", &token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let user = sample_user(UserRole::Staff);
        let token = issue_token("segredo-certo", &user).unwrap();

        let result = decode_token("segredo-errado", &token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let result = decode_token("qualquer-segredo", "nao.sou.jwt");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn bcrypt_hash_only_verifies_the_right_password() {
        // Custo mínimo: o teste valida o fluxo, não a resistência do hash
        let hashed = hash("senha123", 4).unwrap();
        assert!(verify("senha123", &hashed).unwrap());
        assert!(!verify("senha456", &hashed).unwrap());
    }
}
