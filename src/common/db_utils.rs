// src/common/db_utils.rs

use crate::common::error::AppError;

// Constraints UNIQUE nomeadas nas migrations
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";
pub(crate) const COUPONS_CODE_KEY: &str = "coupons_code_key";

/// Nome da constraint quando o erro é violação de unicidade.
pub(crate) fn unique_violation(e: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_err) = e {
        if db_err.is_unique_violation() {
            return Some(db_err.constraint().unwrap_or_default().to_string());
        }
    }
    None
}

/// Converte violação de unicidade em erro amigável; o resto vira DatabaseError.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> AppError {
    match unique_violation(&e).as_deref() {
        Some(USERS_EMAIL_KEY) => AppError::EmailAlreadyExists,
        Some(COUPONS_CODE_KEY) => AppError::CouponCodeConflict,
        Some(other) => AppError::UniqueConstraintViolation(other.to_string()),
        None => e.into(),
    }
}

/// Termo de busca para ILIKE; vazio vira None.
pub(crate) fn like_pattern(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("%{}%", t.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::{borrow::Cow, error::Error as StdError, fmt};

    // Erro de banco sintético: só o tipo e a constraint importam aqui
    #[derive(Debug)]
    struct FakeDbError {
        kind: ErrorKind,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?} on {:?}", self.kind, self.constraint)
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake"
        }
        fn code(&self) -> Option<Cow<'_, str>> {
            None
        }
        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }
        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }
        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
        fn constraint(&self) -> Option<&str> {
            self.constraint
        }
        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn db_error(kind: ErrorKind, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { kind, constraint }))
    }

    #[test]
    fn duplicate_coupon_code_is_a_conflict() {
        let err = map_unique_violation(db_error(ErrorKind::UniqueViolation, Some(COUPONS_CODE_KEY)));
        assert!(matches!(err, AppError::CouponCodeConflict));
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
    }

    #[test]
    fn duplicate_email_and_other_constraints() {
        let err = map_unique_violation(db_error(ErrorKind::UniqueViolation, Some(USERS_EMAIL_KEY)));
        assert!(matches!(err, AppError::EmailAlreadyExists));

        let err = map_unique_violation(db_error(ErrorKind::UniqueViolation, Some("outra_key")));
        assert!(matches!(err, AppError::UniqueConstraintViolation(ref c) if c == "outra_key"));
    }

    #[test]
    fn other_database_errors_pass_through() {
        let err = map_unique_violation(db_error(ErrorKind::ForeignKeyViolation, Some("leads_assigned_to_fkey")));
        assert!(matches!(err, AppError::DatabaseError(_)));

        let err = map_unique_violation(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(Some("casa")), Some("%casa%".to_string()));
        assert_eq!(like_pattern(Some("50%_off")), Some("%50\\%\\_off%".to_string()));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }
}
