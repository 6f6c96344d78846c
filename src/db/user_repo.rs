// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{like_pattern, map_unique_violation},
        error::AppError,
    },
    models::auth::{PasswordReset, UpdateUserPayload, User, UserRole},
};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, phone, address, \
     membership_plan, agent_bio, license_number, created_at, updated_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail (sem diferenciar maiúsculas)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário. E-mail duplicado vira EmailAlreadyExists.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
        phone: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, role, phone) \
             VALUES ($1, lower($2), $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(role)
            .bind(phone)
            .fetch_one(executor)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  REDEFINIÇÃO DE SENHA
    // =========================================================================

    pub async fn create_password_reset(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query("INSERT INTO password_resets (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Token ainda não usado e dentro da validade. Trava a linha até o fim da transação.
    pub async fn find_valid_reset<'e, E>(
        &self,
        executor: E,
        token: &str,
    ) -> Result<Option<PasswordReset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reset = sqlx::query_as::<_, PasswordReset>(
            r#"
            SELECT token, user_id, expires_at, used_at, created_at
            FROM password_resets
            WHERE token = $1 AND used_at IS NULL AND expires_at > now()
            FOR UPDATE
            "#,
        )
        .bind(token)
        .fetch_optional(executor)
        .await?;
        Ok(reset)
    }

    pub async fn mark_reset_used<'e, E>(&self, executor: E, token: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE password_resets SET used_at = now() WHERE token = $1")
            .bind(token)
            .execute(executor)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  ADMIN
    // =========================================================================

    pub async fn list(&self, role: Option<UserRole>, search: Option<&str>) -> Result<Vec<User>, AppError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2)
            ORDER BY created_at DESC
            "#
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(role)
            .bind(like_pattern(search))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn list_agents(&self) -> Result<Vec<User>, AppError> {
        self.list(Some(UserRole::Agent), None).await
    }

    // Atualização parcial: campos ausentes mantêm o valor atual
    pub async fn update(&self, id: Uuid, payload: &UpdateUserPayload) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                role = COALESCE($5, role),
                agent_bio = COALESCE($6, agent_bio),
                license_number = COALESCE($7, license_number),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(payload.name.as_deref())
            .bind(payload.phone.as_deref())
            .bind(payload.address.as_deref())
            .bind(payload.role)
            .bind(payload.agent_bio.as_deref())
            .bind(payload.license_number.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Só corretores têm plano
    pub async fn set_membership_plan(&self, id: Uuid, plan: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET membership_plan = $2, updated_at = now() \
             WHERE id = $1 AND role = 'agent' RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(plan)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
