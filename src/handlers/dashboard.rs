// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::ApiError,
    common::extract::Json,
    config::AppState,
    middleware::i18n::Locale,
    // Importamos os models para referenciar no Swagger
    models::dashboard::{DailyLeadCount, DashboardStats, RevenueEntry, StatusCount},
};

const WEEK_DAYS: u32 = 7;
const MONTH_DAYS: u32 = 30;

// GET /api/admin/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    tag = "Admin - Dashboard",
    responses(
        (status = 200, description = "Totais e crescimento mês a mês", body = DashboardStats),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .dashboard_service
        .stats()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}

async fn leads_chart(app_state: AppState, locale: Locale, days: u32) -> Result<Json<Vec<DailyLeadCount>>, ApiError> {
    let entries = app_state
        .dashboard_service
        .leads_per_day(days)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(entries))
}

// GET /api/admin/dashboard/leads-week
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/leads-week",
    tag = "Admin - Dashboard",
    responses((status = 200, description = "Leads novos e atribuídos por dia (7 dias)", body = Vec<DailyLeadCount>)),
    security(("api_jwt" = []))
)]
pub async fn get_leads_week(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<DailyLeadCount>>, ApiError> {
    leads_chart(app_state, locale, WEEK_DAYS).await
}

// GET /api/admin/dashboard/leads-month
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/leads-month",
    tag = "Admin - Dashboard",
    responses((status = 200, description = "Leads novos e atribuídos por dia (30 dias)", body = Vec<DailyLeadCount>)),
    security(("api_jwt" = []))
)]
pub async fn get_leads_month(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<DailyLeadCount>>, ApiError> {
    leads_chart(app_state, locale, MONTH_DAYS).await
}

// GET /api/admin/dashboard/properties-status
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/properties-status",
    tag = "Admin - Dashboard",
    responses((status = 200, description = "Quantidade de anúncios por status", body = Vec<StatusCount>)),
    security(("api_jwt" = []))
)]
pub async fn get_properties_status(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let counts = app_state
        .dashboard_service
        .properties_by_status()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(counts))
}

// GET /api/admin/dashboard/revenue
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/revenue",
    tag = "Admin - Dashboard",
    responses((status = 200, description = "Vendas e locações fechadas por mês (12 meses)", body = Vec<RevenueEntry>)),
    security(("api_jwt" = []))
)]
pub async fn get_revenue(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let revenue = app_state
        .dashboard_service
        .revenue()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(revenue))
}
