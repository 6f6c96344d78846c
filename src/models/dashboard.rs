// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::property::PropertyStatus;

// Contagens brutas (uma única ida ao banco)
#[derive(Debug, Clone, Default, FromRow)]
pub struct DashboardCounts {
    pub total_properties: i64,
    pub pending_properties: i64,
    pub published_properties: i64,
    pub total_users: i64,
    pub total_agents: i64,
    pub total_leads: i64,
    pub unassigned_leads: i64,
    pub total_inquiries: i64,
    pub properties_this_month: i64,
    pub properties_last_month: i64,
    pub users_this_month: i64,
    pub users_last_month: i64,
}

// 1. Cards do topo
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_properties: i64,
    pub pending_properties: i64,
    pub published_properties: i64,
    pub total_users: i64,
    pub total_agents: i64,
    pub total_leads: i64,
    pub unassigned_leads: i64,
    pub total_inquiries: i64,
    pub active_coupons: i64,
    pub properties_this_month: i64,
    pub properties_last_month: i64,
    #[schema(example = 12.5)]
    pub property_growth: f64,
    pub users_this_month: i64,
    pub users_last_month: i64,
    pub user_growth: f64,
}

// 2. Leads por dia (7 ou 30 dias)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyLeadCount {
    #[schema(example = "2025-03-14")]
    pub date: String,
    pub new_leads: i64,
    pub assigned_leads: i64,
}

// 3. Anúncios por status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: PropertyStatus,
    pub count: i64,
}

#[derive(Debug, FromRow)]
pub struct StatusCountRow {
    pub status: PropertyStatus,
    pub count: i64,
}

// 4. Receita por mês
#[derive(Debug, FromRow)]
pub struct RevenueRow {
    pub month: Option<String>, // to_char(..., 'YYYY-MM')
    pub total: Option<Decimal>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEntry {
    #[schema(example = "2025-03")]
    pub month: String,
    pub total: Decimal,
    pub count: i64,
}
