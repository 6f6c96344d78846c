// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use sqlx::PgPool;
use subtle::ConstantTimeEq;

use crate::{
    common::error::AppError,
    config::Settings,
    db::UserRepository,
    models::auth::{Claims, RegisterAdminPayload, RegisterUserPayload, User, UserRole},
    services::email_service::EmailService,
};

const RESET_TOKEN_LEN: usize = 40;
const RESET_TOKEN_TTL_HOURS: i64 = 1;

pub fn encode_token(user: &User, secret: &str, ttl_days: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::days(ttl_days);

    let claims = Claims {
        sub: user.id,
        role: user.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

/// Token de redefinição: 40 caracteres alfanuméricos.
pub fn generate_reset_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}

// Comparação em tempo constante da chave de registro de admin
fn admin_key_matches(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    email_service: EmailService,
    settings: Arc<Settings>,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        email_service: EmailService,
        settings: Arc<Settings>,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, email_service, settings, pool }
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        encode_token(user, &self.settings.jwt_secret, self.settings.jwt_ttl_days)
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<(String, User), AppError> {
        let hashed_password = hash_password(&payload.password).await?;

        let user = self
            .user_repo
            .create_user(
                &self.pool,
                payload.name.trim(),
                payload.email.trim(),
                &hashed_password,
                UserRole::User,
                payload.phone.as_deref(),
            )
            .await?;

        tracing::info!("👤 Novo usuário registrado: {}", user.id);
        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    pub async fn register_admin(&self, payload: &RegisterAdminPayload) -> Result<(String, User), AppError> {
        let expected = self
            .settings
            .admin_registration_key
            .as_deref()
            .ok_or(AppError::AdminRegistrationDisabled)?;

        if !admin_key_matches(expected, &payload.admin_key) {
            tracing::warn!("Tentativa de registro de admin com chave inválida ({})", payload.email);
            return Err(AppError::InvalidAdminKey);
        }

        let hashed_password = hash_password(&payload.password).await?;
        let user = self
            .user_repo
            .create_user(
                &self.pool,
                payload.name.trim(),
                payload.email.trim(),
                &hashed_password,
                UserRole::Admin,
                None,
            )
            .await?;

        tracing::info!("🛡️ Novo admin registrado: {}", user.id);
        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Token válido e usuário ainda existente.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(token, &self.settings.jwt_secret)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    /// Sempre responde OK, exista ou não a conta.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repo.find_by_email(email.trim()).await? else {
            tracing::info!("Pedido de redefinição para e-mail não cadastrado");
            return Ok(());
        };

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        self.user_repo.create_password_reset(&token, user.id, expires_at).await?;

        if let Err(e) = self.email_service.send_password_reset(&user, &token).await {
            tracing::warn!("⚠️ Falha ao enviar e-mail de redefinição para {}: {}", user.id, e);
        }
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let hashed_password = hash_password(new_password).await?;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        let reset = self
            .user_repo
            .find_valid_reset(&mut *tx, token.trim())
            .await?
            .ok_or(AppError::InvalidResetToken)?;

        self.user_repo
            .update_password(&mut *tx, reset.user_id, &hashed_password)
            .await?;
        self.user_repo.mark_reset_used(&mut *tx, &reset.token).await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!("🔑 Senha redefinida para o usuário {}", reset.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@email.com".into(),
            password_hash: String::new(),
            role,
            phone: None,
            address: None,
            membership_plan: String::new(),
            agent_bio: None,
            license_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip_keeps_subject_and_role() {
        let admin = user(UserRole::Admin);
        let token = encode_token(&admin, "segredo", 7).unwrap();
        let claims = decode_token(&token, "segredo").unwrap();
        assert_eq!(claims.sub, admin.id);
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_token(&user(UserRole::User), "segredo", 7).unwrap();
        assert!(matches!(decode_token(&token, "outro"), Err(AppError::InvalidToken)));
        assert!(matches!(decode_token("lixo", "segredo"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Bem além da tolerância padrão de 60s
        let token = encode_token(&user(UserRole::User), "segredo", -1).unwrap();
        assert!(matches!(decode_token(&token, "segredo"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn reset_tokens_are_long_and_alphanumeric() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), RESET_TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn admin_key_comparison() {
        assert!(admin_key_matches("chave-secreta", "chave-secreta"));
        assert!(!admin_key_matches("chave-secreta", "chave-secret"));
        assert!(!admin_key_matches("chave-secreta", ""));
    }
}
