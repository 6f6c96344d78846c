// src/middleware/rbac.rs

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{User, UserRole},
};

/// 1. O Trait que define quais papéis passam
pub trait RoleDef: Send + Sync + 'static {
    fn allows(role: UserRole) -> bool;
    fn name() -> &'static str;
}

/// 2. O Extractor (Guardião). Entrega o usuário já verificado.
pub struct RequireRole<R> {
    pub user: User,
    _role: PhantomData<R>,
}

impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A. Autentica (extension do guardião ou token)
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        // B. Confere o papel
        if !R::allows(user.role) {
            let app_state = AppState::from_ref(state);
            let locale = Locale::from_headers(&parts.headers);
            tracing::warn!("Usuário {} sem o papel '{}'", user.id, R::name());
            return Err(AppError::Forbidden.to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole { user, _role: PhantomData })
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminRole;
impl RoleDef for AdminRole {
    fn allows(role: UserRole) -> bool {
        role == UserRole::Admin
    }
    fn name() -> &'static str { "admin" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_only_allows_admins() {
        assert!(AdminRole::allows(UserRole::Admin));
        assert!(!AdminRole::allows(UserRole::Agent));
        assert!(!AdminRole::allows(UserRole::User));
    }
}
