// src/handlers/tools.rs

use axum::{
    extract::State,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    common::extract::{Json, Query},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        lead::LeadStatus,
        meta::{MortgageQuery, MortgageQuote, StatusMeta},
        property::PropertyStatus,
    },
    services::mortgage,
};

// GET /api/tools/mortgage
#[utoipa::path(
    get,
    path = "/api/tools/mortgage",
    tag = "Tools",
    params(MortgageQuery),
    responses(
        (status = 200, description = "Parcela mensal e totais do financiamento", body = MortgageQuote),
        (status = 400, description = "Parâmetros fora do intervalo")
    )
)]
pub async fn mortgage_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<MortgageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quote = mortgage::calculate(&query)
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(quote))
}

// GET /api/meta/property-statuses
#[utoipa::path(
    get,
    path = "/api/meta/property-statuses",
    tag = "Meta",
    responses((status = 200, description = "Rótulo e cor de cada status de anúncio", body = Vec<StatusMeta>))
)]
pub async fn property_statuses() -> Json<Vec<StatusMeta>> {
    Json(
        PropertyStatus::ALL
            .iter()
            .map(|s| StatusMeta {
                value: s.as_str().to_string(),
                label: s.label().to_string(),
                color: s.color().to_string(),
            })
            .collect(),
    )
}

// GET /api/meta/lead-statuses
#[utoipa::path(
    get,
    path = "/api/meta/lead-statuses",
    tag = "Meta",
    responses((status = 200, description = "Rótulo e cor de cada status de lead", body = Vec<StatusMeta>))
)]
pub async fn lead_statuses() -> Json<Vec<StatusMeta>> {
    Json(
        LeadStatus::ALL
            .iter()
            .map(|s| StatusMeta {
                value: s.as_str().to_string(),
                label: s.label().to_string(),
                color: s.color().to_string(),
            })
            .collect(),
    )
}
