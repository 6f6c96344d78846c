// src/services/dashboard_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{CouponRepository, DashboardRepository},
    models::{
        coupon::CouponStatus,
        dashboard::{DailyLeadCount, DashboardStats, RevenueEntry, RevenueRow, StatusCount, StatusCountRow},
        lead::LeadActivity,
        property::PropertyStatus,
    },
    services::coupon_service,
};

pub const REVENUE_MONTHS: u32 = 12;

/// Variação percentual com uma casa decimal. Mês anterior zerado: 100 se houve algo, senão 0.
pub fn growth_percent(this_month: i64, last_month: i64) -> f64 {
    if last_month == 0 {
        return if this_month > 0 { 100.0 } else { 0.0 };
    }
    let pct = (this_month - last_month) as f64 / last_month as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Uma entrada por dia (UTC), do mais antigo até `today`, incluindo dias zerados.
///
/// "Atribuídos" conta leads com corretor cujo created_at OU updated_at cai no dia;
/// um lead criado num dia e editado noutro aparece nos dois.
pub fn leads_per_day(activity: &[LeadActivity], today: NaiveDate, days: u32) -> Vec<DailyLeadCount> {
    (0..days)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(i64::from(offset));
            let new_leads = activity
                .iter()
                .filter(|a| a.created_at.date_naive() == day)
                .count() as i64;
            let assigned_leads = activity
                .iter()
                .filter(|a| a.assigned && (a.created_at.date_naive() == day || a.updated_at.date_naive() == day))
                .count() as i64;
            DailyLeadCount {
                date: day.format("%Y-%m-%d").to_string(),
                new_leads,
                assigned_leads,
            }
        })
        .collect()
}

/// Todos os status, na ordem do fluxo, com zero para os ausentes.
pub fn fill_status_counts(rows: &[StatusCountRow]) -> Vec<StatusCount> {
    PropertyStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: rows.iter().filter(|r| r.status == *status).map(|r| r.count).sum(),
        })
        .collect()
}

// Primeiro dia do mês `back` meses antes do mês de `today`
fn month_start(today: NaiveDate, back: u32) -> NaiveDate {
    let index = today.year() * 12 + today.month0() as i32 - back as i32;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1).unwrap_or(today)
}

// Meia-noite UTC do dia
fn utc_midnight(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

/// Últimos `months` meses ("YYYY-MM"), do mais antigo ao atual, zerando os meses sem vendas.
pub fn fill_revenue_months(rows: &[RevenueRow], today: NaiveDate, months: u32) -> Vec<RevenueEntry> {
    let by_month: HashMap<&str, &RevenueRow> = rows
        .iter()
        .filter_map(|r| r.month.as_deref().map(|m| (m, r)))
        .collect();

    (0..months)
        .rev()
        .map(|back| {
            let month = month_start(today, back).format("%Y-%m").to_string();
            let (total, count) = by_month
                .get(month.as_str())
                .map(|r| (r.total.unwrap_or(Decimal::ZERO), r.count))
                .unwrap_or((Decimal::ZERO, 0));
            RevenueEntry { month, total, count }
        })
        .collect()
}

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    coupon_repo: CouponRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, coupon_repo: CouponRepository) -> Self {
        Self { repo, coupon_repo }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let now = Utc::now();
        let today = now.date_naive();
        let counts = self
            .repo
            .counts(utc_midnight(month_start(today, 0)), utc_midnight(month_start(today, 1)))
            .await?;

        // Validade do cupom é calculada, não gravada: conta aqui
        let active_coupons = self
            .coupon_repo
            .list()
            .await?
            .into_iter()
            .map(|c| coupon_service::to_view(c, now))
            .filter(|v| v.status == CouponStatus::Available)
            .count() as i64;

        Ok(DashboardStats {
            total_properties: counts.total_properties,
            pending_properties: counts.pending_properties,
            published_properties: counts.published_properties,
            total_users: counts.total_users,
            total_agents: counts.total_agents,
            total_leads: counts.total_leads,
            unassigned_leads: counts.unassigned_leads,
            total_inquiries: counts.total_inquiries,
            active_coupons,
            properties_this_month: counts.properties_this_month,
            properties_last_month: counts.properties_last_month,
            property_growth: growth_percent(counts.properties_this_month, counts.properties_last_month),
            users_this_month: counts.users_this_month,
            users_last_month: counts.users_last_month,
            user_growth: growth_percent(counts.users_this_month, counts.users_last_month),
        })
    }

    pub async fn leads_per_day(&self, days: u32) -> Result<Vec<DailyLeadCount>, AppError> {
        let today = Utc::now().date_naive();
        let first_day = today - Duration::days(i64::from(days.saturating_sub(1)));
        let since = utc_midnight(first_day);

        let activity = self.repo.lead_activity_since(since).await?;
        Ok(leads_per_day(&activity, today, days))
    }

    pub async fn properties_by_status(&self) -> Result<Vec<StatusCount>, AppError> {
        let rows = self.repo.status_counts().await?;
        Ok(fill_status_counts(&rows))
    }

    pub async fn revenue(&self) -> Result<Vec<RevenueEntry>, AppError> {
        let today = Utc::now().date_naive();
        let first_month = month_start(today, REVENUE_MONTHS - 1);
        let since = utc_midnight(first_month);

        let rows = self.repo.revenue_since(since).await?;
        Ok(fill_revenue_months(&rows, today, REVENUE_MONTHS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn growth_rules() {
        assert_eq!(growth_percent(15, 10), 50.0);
        assert_eq!(growth_percent(5, 10), -50.0);
        assert_eq!(growth_percent(4, 3), 33.3);
        assert_eq!(growth_percent(3, 0), 100.0);
        assert_eq!(growth_percent(0, 0), 0.0);
    }

    #[test]
    fn month_bounds_are_utc_midnights() {
        let today = date(2025, 1, 31);
        assert_eq!(utc_midnight(month_start(today, 0)), at(2025, 1, 1, 0));
        assert_eq!(utc_midnight(month_start(today, 1)), at(2024, 12, 1, 0));
    }

    #[test]
    fn leads_per_day_includes_empty_days_oldest_first() {
        let today = date(2025, 3, 10);
        let activity = vec![LeadActivity {
            created_at: at(2025, 3, 10, 9),
            updated_at: at(2025, 3, 10, 9),
            assigned: false,
        }];

        let days = leads_per_day(&activity, today, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, "2025-03-04");
        assert_eq!(days[6].date, "2025-03-10");
        assert_eq!(days[6].new_leads, 1);
        assert!(days[..6].iter().all(|d| d.new_leads == 0 && d.assigned_leads == 0));
    }

    #[test]
    fn assigned_lead_counts_on_creation_and_update_days() {
        let today = date(2025, 3, 10);
        let activity = vec![LeadActivity {
            created_at: at(2025, 3, 8, 10),
            updated_at: at(2025, 3, 10, 16),
            assigned: true,
        }];

        let days = leads_per_day(&activity, today, 7);
        let by_date = |d: &str| days.iter().find(|e| e.date == d).unwrap().clone();

        assert_eq!(by_date("2025-03-08").assigned_leads, 1);
        assert_eq!(by_date("2025-03-08").new_leads, 1);
        assert_eq!(by_date("2025-03-10").assigned_leads, 1);
        assert_eq!(by_date("2025-03-10").new_leads, 0);
        assert_eq!(by_date("2025-03-09").assigned_leads, 0);
    }

    #[test]
    fn status_counts_cover_every_status() {
        let rows = vec![
            StatusCountRow { status: PropertyStatus::Published, count: 7 },
            StatusCountRow { status: PropertyStatus::Sold, count: 2 },
        ];
        let filled = fill_status_counts(&rows);
        assert_eq!(filled.len(), PropertyStatus::ALL.len());
        assert_eq!(filled[0], StatusCount { status: PropertyStatus::Pending, count: 0 });
        assert_eq!(filled[1].count, 7);
        assert_eq!(filled[2].count, 2);
    }

    #[test]
    fn revenue_covers_twelve_months_across_year_boundary() {
        let today = date(2025, 2, 14);
        let rows = vec![RevenueRow {
            month: Some("2024-12".to_string()),
            total: Some(Decimal::new(350_000, 0)),
            count: 1,
        }];

        let entries = fill_revenue_months(&rows, today, 12);
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[0].month, "2024-03");
        assert_eq!(entries[11].month, "2025-02");

        let december = entries.iter().find(|e| e.month == "2024-12").unwrap();
        assert_eq!(december.total, Decimal::new(350_000, 0));
        assert_eq!(december.count, 1);
        assert_eq!(entries[11].total, Decimal::ZERO);
    }
}
