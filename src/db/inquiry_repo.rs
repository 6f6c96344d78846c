// src/db/inquiry_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inquiry::{CreateInquiryPayload, Inquiry, InquiryStatus},
};

// Espera `i` (inquiries) e `p` (properties)
const INQUIRY_SELECT: &str = r#"
    SELECT
        i.id, i.name, i.email, i.phone, i.message, i.property_id,
        p.title AS property_title, i.status, i.created_at
"#;

#[derive(Clone)]
pub struct InquiryRepository {
    pool: PgPool,
}

impl InquiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateInquiryPayload) -> Result<Inquiry, AppError> {
        let sql = format!(
            r#"
            WITH i AS (
                INSERT INTO inquiries (name, email, phone, message, property_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            {INQUIRY_SELECT}
            FROM i
            LEFT JOIN properties p ON p.id = i.property_id
            "#
        );
        let inquiry = sqlx::query_as::<_, Inquiry>(&sql)
            .bind(&payload.name)
            .bind(&payload.email)
            .bind(payload.phone.as_deref())
            .bind(&payload.message)
            .bind(payload.property_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(inquiry)
    }

    pub async fn list(&self) -> Result<Vec<Inquiry>, AppError> {
        let sql = format!(
            "{INQUIRY_SELECT} FROM inquiries i LEFT JOIN properties p ON p.id = i.property_id \
             ORDER BY i.created_at DESC"
        );
        let inquiries = sqlx::query_as::<_, Inquiry>(&sql).fetch_all(&self.pool).await?;
        Ok(inquiries)
    }

    pub async fn set_status(&self, id: Uuid, status: InquiryStatus) -> Result<Option<Inquiry>, AppError> {
        let sql = format!(
            r#"
            WITH i AS (
                UPDATE inquiries SET status = $2 WHERE id = $1 RETURNING *
            )
            {INQUIRY_SELECT}
            FROM i
            LEFT JOIN properties p ON p.id = i.property_id
            "#
        );
        let inquiry = sqlx::query_as::<_, Inquiry>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(inquiry)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
