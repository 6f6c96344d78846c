// src/db/lead_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::like_pattern, error::AppError},
    models::lead::{CreateLeadPayload, Lead, LeadQuery, LeadStatus, UpdateLeadPayload},
};

// Colunas do lead + nome do corretor. Espera `l` (leads) e `u` (users).
const LEAD_SELECT: &str = r#"
    SELECT
        l.id, l.first_name, l.last_name, l.email, l.phone, l.requirements,
        l.category, l.label, l.status, l.country, l.state_province, l.city,
        l.internal_note, l.assigned_to, u.name AS assigned_agent_name,
        l.source, l.created_at, l.updated_at
"#;

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &LeadQuery) -> Result<Vec<Lead>, AppError> {
        let sql = format!(
            r#"
            {LEAD_SELECT}
            FROM leads l
            LEFT JOIN users u ON u.id = l.assigned_to
            WHERE ($1::lead_status IS NULL OR l.status = $1)
              AND ($2::uuid IS NULL OR l.assigned_to = $2)
              AND (NOT $3 OR l.assigned_to IS NULL)
              AND ($4::text IS NULL
                   OR l.first_name ILIKE $4
                   OR l.last_name ILIKE $4
                   OR l.email ILIKE $4)
            ORDER BY l.created_at DESC
            "#
        );
        let leads = sqlx::query_as::<_, Lead>(&sql)
            .bind(query.status)
            .bind(query.assigned_to)
            .bind(query.unassigned)
            .bind(like_pattern(query.search.as_deref()))
            .fetch_all(&self.pool)
            .await?;
        Ok(leads)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let sql = format!(
            "{LEAD_SELECT} FROM leads l LEFT JOIN users u ON u.id = l.assigned_to WHERE l.id = $1"
        );
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lead)
    }

    pub async fn create(&self, payload: &CreateLeadPayload) -> Result<Lead, AppError> {
        let sql = format!(
            r#"
            WITH l AS (
                INSERT INTO leads (
                    first_name, last_name, email, phone, requirements, category, label,
                    status, country, state_province, city, internal_note, assigned_to, source
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING *
            )
            {LEAD_SELECT}
            FROM l
            LEFT JOIN users u ON u.id = l.assigned_to
            "#
        );
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(&payload.first_name)
            .bind(payload.last_name.as_deref())
            .bind(&payload.email)
            .bind(payload.phone.as_deref())
            .bind(payload.requirements.as_deref())
            .bind(payload.category.as_deref())
            .bind(payload.label.as_deref())
            .bind(payload.status.unwrap_or(LeadStatus::Pending))
            .bind(payload.country.as_deref())
            .bind(payload.state_province.as_deref())
            .bind(payload.city.as_deref())
            .bind(payload.internal_note.as_deref())
            .bind(payload.assigned_to)
            .bind(payload.source.as_deref().unwrap_or("website"))
            .fetch_one(&self.pool)
            .await?;
        Ok(lead)
    }

    // Atualização parcial. `assigned_to` só muda quando o campo veio no JSON.
    pub async fn update(&self, id: Uuid, payload: &UpdateLeadPayload) -> Result<Option<Lead>, AppError> {
        let sql = format!(
            r#"
            WITH l AS (
                UPDATE leads SET
                    first_name = COALESCE($2, first_name),
                    last_name = COALESCE($3, last_name),
                    email = COALESCE($4, email),
                    phone = COALESCE($5, phone),
                    requirements = COALESCE($6, requirements),
                    category = COALESCE($7, category),
                    label = COALESCE($8, label),
                    status = COALESCE($9, status),
                    country = COALESCE($10, country),
                    state_province = COALESCE($11, state_province),
                    city = COALESCE($12, city),
                    internal_note = COALESCE($13, internal_note),
                    assigned_to = CASE WHEN $14 THEN $15 ELSE assigned_to END,
                    source = COALESCE($16, source),
                    updated_at = now()
                WHERE id = $1
                RETURNING *
            )
            {LEAD_SELECT}
            FROM l
            LEFT JOIN users u ON u.id = l.assigned_to
            "#
        );
        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .bind(payload.first_name.as_deref())
            .bind(payload.last_name.as_deref())
            .bind(payload.email.as_deref())
            .bind(payload.phone.as_deref())
            .bind(payload.requirements.as_deref())
            .bind(payload.category.as_deref())
            .bind(payload.label.as_deref())
            .bind(payload.status)
            .bind(payload.country.as_deref())
            .bind(payload.state_province.as_deref())
            .bind(payload.city.as_deref())
            .bind(payload.internal_note.as_deref())
            .bind(payload.assigned_to.is_some())
            .bind(payload.assigned_to.flatten())
            .bind(payload.source.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(lead)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// `assigned_to` de todos os leads (base do cálculo de cota).
    pub async fn list_assignments(&self) -> Result<Vec<Option<Uuid>>, AppError> {
        let assignments = sqlx::query_scalar::<_, Option<Uuid>>("SELECT assigned_to FROM leads")
            .fetch_all(&self.pool)
            .await?;
        Ok(assignments)
    }
}

// DATABASE_URL=postgres://... cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;

    async fn agent_id(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO users (name, email, password_hash, role, membership_plan) \
             VALUES ('Carla', 'carla@imoveis.test', 'x', 'agent', 'Priority') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn assignment_changes_only_when_the_field_is_sent(pool: PgPool) {
        let repo = LeadRepository::new(pool.clone());
        let agent = agent_id(&pool).await;

        let lead = repo
            .create(&CreateLeadPayload {
                first_name: "Ana".into(),
                email: "ana@email.com".into(),
                assigned_to: Some(agent),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(lead.assigned_to, Some(agent));
        assert_eq!(lead.assigned_agent_name.as_deref(), Some("Carla"));
        assert_eq!(lead.source, "website");

        // Campo ausente: mantém o corretor
        let kept = repo
            .update(lead.id, &UpdateLeadPayload { city: Some("Recife".into()), ..Default::default() })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.assigned_to, Some(agent));
        assert_eq!(kept.city.as_deref(), Some("Recife"));

        // `assignedTo: null`: remove
        let cleared = repo
            .update(lead.id, &UpdateLeadPayload { assigned_to: Some(None), ..Default::default() })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.assigned_to, None);
        assert_eq!(cleared.assigned_agent_name, None);
        assert_eq!(repo.list_assignments().await.unwrap(), vec![None]);
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn updating_a_missing_lead_returns_none(pool: PgPool) {
        let repo = LeadRepository::new(pool);
        let result = repo.update(Uuid::new_v4(), &UpdateLeadPayload::default()).await.unwrap();
        assert!(result.is_none());
    }
}
