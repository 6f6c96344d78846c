// src/services/coupon_service.rs

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CouponRepository,
    models::coupon::{Coupon, CouponStatus, CouponView, CreateCouponPayload},
};

// Sem 0/O, 1/I/L para evitar confusão na leitura
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const BASE_CODE_LEN: usize = 10;
pub const MAX_CODE_ATTEMPTS: usize = 6;

pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Gera um código livre. A cada colisão o código cresce um caractere (10, 11, ... 15).
/// Esgotadas as tentativas devolve o último código mesmo assim: o índice único decide.
pub async fn find_free_code<F, Fut>(mut exists: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    let mut code = String::new();
    for attempt in 0..MAX_CODE_ATTEMPTS {
        code = generate_code(&mut rand::thread_rng(), BASE_CODE_LEN + attempt);
        if !exists(code.clone()).await? {
            return Ok(code);
        }
        tracing::debug!("Colisão de código de cupom na tentativa {}", attempt + 1);
    }
    tracing::warn!(
        "⚠️ {} colisões seguidas de código de cupom; gravando '{}' assim mesmo",
        MAX_CODE_ATTEMPTS,
        code
    );
    Ok(code)
}

/// `expires_at` explícito vence; senão `created_at + duration_minutes`.
pub fn compute_expiry(
    created_at: DateTime<Utc>,
    duration_minutes: Option<i32>,
    expires_at: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    expires_at.or_else(|| duration_minutes.map(|minutes| created_at + Duration::minutes(i64::from(minutes))))
}

pub fn coupon_status(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> CouponStatus {
    match expiry {
        Some(expiry) if now > expiry => CouponStatus::Expired,
        Some(_) => CouponStatus::Available,
        None => CouponStatus::Unknown,
    }
}

pub fn to_view(coupon: Coupon, now: DateTime<Utc>) -> CouponView {
    let expires_at = compute_expiry(coupon.created_at, coupon.duration_minutes, coupon.expires_at);
    CouponView {
        coupon,
        expires_at,
        status: coupon_status(expires_at, now),
    }
}

#[derive(Clone)]
pub struct CouponService {
    repo: CouponRepository,
}

impl CouponService {
    pub fn new(repo: CouponRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: &CreateCouponPayload, created_by: Uuid) -> Result<CouponView, AppError> {
        let repo = &self.repo;
        let code = find_free_code(|candidate| async move { repo.code_exists(&candidate).await }).await?;

        let coupon = self.repo.create(payload, &code, created_by).await?;
        tracing::info!("🎟️ Cupom {} criado para o plano {}", coupon.code, coupon.plan_name);

        Ok(to_view(coupon, Utc::now()))
    }

    pub async fn list(&self) -> Result<Vec<CouponView>, AppError> {
        let now = Utc::now();
        let coupons = self.repo.list().await?;
        Ok(coupons.into_iter().map(|c| to_view(c, now)).collect())
    }

    pub async fn find_by_code(&self, code: &str) -> Result<CouponView, AppError> {
        let coupon = self
            .repo
            .find_by_code(code.trim())
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Coupon".to_string()))?;
        Ok(to_view(coupon, Utc::now()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::ResourceNotFound("Coupon".to_string()));
        }
        tracing::info!("🗑️ Cupom {} removido", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashSet;
    use chrono::TimeZone;

    fn is_alphabet_only(code: &str) -> bool {
        code.bytes().all(|b| CODE_ALPHABET.contains(&b))
    }

    #[test]
    fn generated_codes_use_only_the_alphabet() {
        let mut rng = rand::thread_rng();
        for len in [10, 12, 15] {
            let code = generate_code(&mut rng, len);
            assert_eq!(code.len(), len);
            assert!(is_alphabet_only(&code), "{code}");
        }
    }

    #[tokio::test]
    async fn back_to_back_codes_without_collisions() {
        let first = find_free_code(|_| async { Ok(false) }).await.unwrap();
        let second = find_free_code(|_| async { Ok(false) }).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(second.len(), 10);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn each_collision_grows_the_code() {
        let calls = Cell::new(0);
        let code = find_free_code(|_| {
            calls.set(calls.get() + 1);
            let taken = calls.get() <= 2;
            async move { Ok(taken) }
        })
        .await
        .unwrap();
        assert_eq!(calls.get(), 3);
        assert_eq!(code.len(), 12);
    }

    #[tokio::test]
    async fn exhausted_retries_still_return_a_code() {
        let mut seen = HashSet::new();
        let code = find_free_code(|candidate| {
            seen.insert(candidate.len());
            async { Ok(true) }
        })
        .await
        .unwrap();
        assert_eq!(code.len(), BASE_CODE_LEN + MAX_CODE_ATTEMPTS - 1);
        assert_eq!(seen.len(), MAX_CODE_ATTEMPTS);
        assert!(is_alphabet_only(&code));
    }

    #[test]
    fn expiry_boundaries() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let expiry = compute_expiry(t0, Some(60), None).unwrap();
        assert_eq!(expiry, t0 + Duration::minutes(60));

        let just_before = expiry - Duration::milliseconds(1);
        let just_after = expiry + Duration::milliseconds(1);
        assert_eq!(coupon_status(Some(expiry), just_before), CouponStatus::Available);
        assert_eq!(coupon_status(Some(expiry), expiry), CouponStatus::Available);
        assert_eq!(coupon_status(Some(expiry), just_after), CouponStatus::Expired);
    }

    #[test]
    fn explicit_expiry_wins_over_duration() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let explicit = t0 + Duration::days(30);
        assert_eq!(compute_expiry(t0, Some(10), Some(explicit)), Some(explicit));
    }

    #[test]
    fn unknown_without_duration_or_explicit_expiry() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let expiry = compute_expiry(t0, None, None);
        assert_eq!(expiry, None);
        assert_eq!(coupon_status(expiry, Utc::now()), CouponStatus::Unknown);
    }
}
