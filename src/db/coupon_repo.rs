// src/db/coupon_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::coupon::{Coupon, CreateCouponPayload},
};

const COUPON_COLUMNS: &str = "id, title, plan_name, price, duration_minutes, plan_duration, \
     referral_fee, payment_link, code, created_by, created_at, expires_at";

#[derive(Clone)]
pub struct CouponRepository {
    pool: PgPool,
}

impl CouponRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM coupons WHERE code = $1)")
            .bind(code)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    // O índice único em `code` é a última barreira contra colisões
    pub async fn create(
        &self,
        payload: &CreateCouponPayload,
        code: &str,
        created_by: Uuid,
    ) -> Result<Coupon, AppError> {
        let sql = format!(
            r#"
            INSERT INTO coupons (
                title, plan_name, price, duration_minutes, plan_duration,
                referral_fee, payment_link, code, created_by, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COUPON_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Coupon>(&sql)
            .bind(&payload.title)
            .bind(&payload.plan_name)
            .bind(payload.price)
            .bind(payload.duration_minutes)
            .bind(payload.plan_duration.as_deref())
            .bind(payload.referral_fee)
            .bind(payload.payment_link.as_deref())
            .bind(code)
            .bind(created_by)
            .bind(payload.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn list(&self) -> Result<Vec<Coupon>, AppError> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons ORDER BY created_at DESC");
        let coupons = sqlx::query_as::<_, Coupon>(&sql).fetch_all(&self.pool).await?;
        Ok(coupons)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, AppError> {
        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE code = $1");
        let coupon = sqlx::query_as::<_, Coupon>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(coupon)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
