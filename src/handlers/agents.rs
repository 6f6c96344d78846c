// src/handlers/agents.rs

use axum::{
    extract::State,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    common::extract::{Json, Path},
    config::AppState,
    middleware::i18n::Locale,
    models::agent::{AgentSummary, PlanEntry, QuotaSummary, UpdateMembershipPayload},
    services::agent_service,
};

// GET /api/admin/agents
#[utoipa::path(
    get,
    path = "/api/admin/agents",
    tag = "Admin - Agents",
    responses(
        (status = 200, description = "Corretores com plano e cota sugerida", body = Vec<AgentSummary>),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_agents(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let agents = app_state
        .agent_service
        .list()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(agents))
}

// GET /api/admin/agents/{id}/quota
#[utoipa::path(
    get,
    path = "/api/admin/agents/{id}/quota",
    tag = "Admin - Agents",
    params(("id" = Uuid, Path, description = "ID do corretor")),
    responses(
        (status = 200, description = "Cota do corretor", body = QuotaSummary),
        (status = 404, description = "Corretor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn agent_quota(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let quota = app_state
        .agent_service
        .quota(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quota))
}

// PUT /api/admin/agents/{id}/membership
#[utoipa::path(
    put,
    path = "/api/admin/agents/{id}/membership",
    tag = "Admin - Agents",
    request_body = UpdateMembershipPayload,
    params(("id" = Uuid, Path, description = "ID do corretor")),
    responses(
        (status = 200, description = "Plano atualizado", body = AgentSummary),
        (status = 404, description = "Corretor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_membership(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMembershipPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let agent = app_state
        .agent_service
        .set_membership(id, payload.plan)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(agent))
}

// GET /api/admin/plans
#[utoipa::path(
    get,
    path = "/api/admin/plans",
    tag = "Admin - Agents",
    responses((status = 200, description = "Planos e leads por mês", body = Vec<PlanEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_plans() -> Json<Vec<PlanEntry>> {
    Json(agent_service::plan_table())
}
