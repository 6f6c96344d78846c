// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{UpdateUserPayload, User, UserListQuery, UserProfile},
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, query: &UserListQuery) -> Result<Vec<UserProfile>, AppError> {
        let users = self.repo.list(query.role, query.search.as_deref()).await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateUserPayload) -> Result<UserProfile, AppError> {
        let user = self.repo.update(id, payload).await?.ok_or(AppError::UserNotFound)?;
        tracing::info!("👤 Usuário {} atualizado", id);
        Ok(user.into())
    }

    // Admin não remove a própria conta
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        if actor.id == id {
            return Err(AppError::CannotDeleteSelf);
        }
        if !self.repo.delete(id).await? {
            return Err(AppError::UserNotFound);
        }
        tracing::info!("🗑️ Usuário {} removido por {}", id, actor.id);
        Ok(())
    }
}
