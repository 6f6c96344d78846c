// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    common::error::AppError,
    models::{
        dashboard::{DashboardCounts, RevenueRow, StatusCountRow},
        lead::LeadActivity,
        property::PropertyStatus,
    },
};

#[derive(Debug, FromRow)]
struct PropertyCounts {
    total: i64,
    pending: i64,
    published: i64,
    this_month: i64,
    last_month: i64,
}

#[derive(Debug, FromRow)]
struct UserCounts {
    total: i64,
    agents: i64,
    this_month: i64,
    last_month: i64,
}

#[derive(Debug, FromRow)]
struct LeadCounts {
    total_leads: i64,
    unassigned_leads: i64,
    total_inquiries: i64,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Contagens dos cards. Os inícios de mês (UTC) vêm do serviço.
    pub async fn counts(
        &self,
        this_month: DateTime<Utc>,
        last_month: DateTime<Utc>,
    ) -> Result<DashboardCounts, AppError> {
        // REPEATABLE READ: as três consultas leem o mesmo snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        // A. Anúncios (mês corrente x mês anterior)
        let properties = sqlx::query_as::<_, PropertyCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'published') AS published,
                COUNT(*) FILTER (WHERE created_at >= $1) AS this_month,
                COUNT(*) FILTER (WHERE created_at >= $2 AND created_at < $1) AS last_month
            FROM properties
            "#,
        )
        .bind(this_month)
        .bind(last_month)
        .fetch_one(&mut *tx)
        .await?;

        // B. Usuários
        let users = sqlx::query_as::<_, UserCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE role = 'agent') AS agents,
                COUNT(*) FILTER (WHERE created_at >= $1) AS this_month,
                COUNT(*) FILTER (WHERE created_at >= $2 AND created_at < $1) AS last_month
            FROM users
            "#,
        )
        .bind(this_month)
        .bind(last_month)
        .fetch_one(&mut *tx)
        .await?;

        // C. Leads e contatos
        let leads = sqlx::query_as::<_, LeadCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM leads) AS total_leads,
                (SELECT COUNT(*) FROM leads WHERE assigned_to IS NULL) AS unassigned_leads,
                (SELECT COUNT(*) FROM inquiries) AS total_inquiries
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardCounts {
            total_properties: properties.total,
            pending_properties: properties.pending,
            published_properties: properties.published,
            total_users: users.total,
            total_agents: users.agents,
            total_leads: leads.total_leads,
            unassigned_leads: leads.unassigned_leads,
            total_inquiries: leads.total_inquiries,
            properties_this_month: properties.this_month,
            properties_last_month: properties.last_month,
            users_this_month: users.this_month,
            users_last_month: users.last_month,
        })
    }

    // 2. Leads criados OU atualizados desde `since`
    pub async fn lead_activity_since(&self, since: DateTime<Utc>) -> Result<Vec<LeadActivity>, AppError> {
        let rows = sqlx::query_as::<_, LeadActivity>(
            r#"
            SELECT created_at, updated_at, assigned_to IS NOT NULL AS assigned
            FROM leads
            WHERE created_at >= $1 OR updated_at >= $1
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // 3. Anúncios por status (só os que existem; o serviço completa com zeros)
    pub async fn status_counts(&self) -> Result<Vec<StatusCountRow>, AppError> {
        let rows = sqlx::query_as::<_, StatusCountRow>(
            "SELECT status, COUNT(*) AS count FROM properties GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // 4. Negócios fechados (vendido/alugado) por mês da última atualização
    pub async fn revenue_since(&self, since: DateTime<Utc>) -> Result<Vec<RevenueRow>, AppError> {
        let rows = sqlx::query_as::<_, RevenueRow>(
            r#"
            SELECT
                to_char(date_trunc('month', updated_at AT TIME ZONE 'UTC'), 'YYYY-MM') AS month,
                SUM(price) AS total,
                COUNT(*) AS count
            FROM properties
            WHERE status::text = ANY($2)
              AND updated_at >= $1
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(since)
        .bind(PropertyStatus::closed_deals())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// DATABASE_URL=postgres://... cargo test -- --ignored
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    async fn insert_lead(pool: &PgPool, email: &str, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        sqlx::query("INSERT INTO leads (first_name, email, created_at, updated_at) VALUES ('Lead', $1, $2, $3)")
            .bind(email)
            .bind(created_at)
            .bind(updated_at)
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn lead_activity_includes_leads_updated_inside_the_window(pool: PgPool) {
        let repo = DashboardRepository::new(pool.clone());
        let since = at(2025, 3, 1);

        insert_lead(&pool, "antigo@email.com", at(2025, 1, 10), at(2025, 1, 10)).await;
        insert_lead(&pool, "editado@email.com", at(2025, 1, 10), at(2025, 3, 5)).await;
        insert_lead(&pool, "novo@email.com", at(2025, 3, 2), at(2025, 3, 2)).await;

        let activity = repo.lead_activity_since(since).await.unwrap();
        assert_eq!(activity.len(), 2);
        assert!(activity.iter().all(|a| a.created_at >= since || a.updated_at >= since));
        assert!(activity.iter().all(|a| !a.assigned));
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn month_counts_use_the_given_bounds(pool: PgPool) {
        let repo = DashboardRepository::new(pool.clone());

        for (title, created_at) in [("Março", at(2025, 3, 3)), ("Fevereiro", at(2025, 2, 20)), ("Janeiro", at(2025, 1, 5))] {
            sqlx::query(
                "INSERT INTO properties (title, price, property_type, address, city, created_at) \
                 VALUES ($1, 100000, 'house', 'Rua A', 'Natal', $2)",
            )
            .bind(title)
            .bind(created_at)
            .execute(&pool)
            .await
            .unwrap();
        }

        let this_month = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let last_month = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let counts = repo.counts(this_month, last_month).await.unwrap();

        assert_eq!(counts.total_properties, 3);
        assert_eq!(counts.pending_properties, 3);
        assert_eq!(counts.properties_this_month, 1);
        assert_eq!(counts.properties_last_month, 1);
    }

    #[sqlx::test]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn revenue_only_counts_closed_deals(pool: PgPool) {
        let repo = DashboardRepository::new(pool.clone());

        for (status, price) in [("sold", 300000), ("rented", 2500), ("published", 999999)] {
            sqlx::query(
                "INSERT INTO properties (title, price, property_type, address, city, status, updated_at) \
                 VALUES ('Imóvel', $1, 'house', 'Rua B', 'Natal', $2::property_status, $3)",
            )
            .bind(rust_decimal::Decimal::from(price))
            .bind(status)
            .bind(at(2025, 3, 10))
            .execute(&pool)
            .await
            .unwrap();
        }

        let rows = repo.revenue_since(at(2025, 1, 1)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month.as_deref(), Some("2025-03"));
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].total, Some(rust_decimal::Decimal::from(302500)));
    }
}
