// src/handlers/properties.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    common::extract::{Json, Path, Query},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::MessageResponse,
        property::{
            AdminPropertyQuery, CreatePropertyPayload, Property, PropertyPage, PropertyQuery,
            ReviewDecision, UpdatePropertyPayload, UpdatePropertyStatusPayload,
        },
    },
};

// =============================================================================
//  PÚBLICO
// =============================================================================

// GET /api/properties
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Properties",
    params(PropertyQuery),
    responses((status = 200, description = "Anúncios publicados, paginados", body = PropertyPage))
)]
pub async fn search_properties(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PropertyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .property_service
        .search(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// GET /api/properties/featured
#[utoipa::path(
    get,
    path = "/api/properties/featured",
    tag = "Properties",
    responses((status = 200, description = "Até 6 anúncios em destaque", body = Vec<Property>))
)]
pub async fn featured_properties(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let properties = app_state
        .property_service
        .featured()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(properties))
}

// GET /api/properties/{id}
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Detalhe do anúncio (conta uma visualização)", body = Property),
        (status = 404, description = "Anúncio não encontrado")
    )
)]
pub async fn get_property(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let property = app_state
        .property_service
        .view(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(property))
}

// =============================================================================
//  AUTENTICADO (DONO / ADMIN)
// =============================================================================

// POST /api/properties
#[utoipa::path(
    post,
    path = "/api/properties",
    tag = "Properties",
    request_body = CreatePropertyPayload,
    responses(
        (status = 201, description = "Anúncio criado (pendente, ou publicado se admin)", body = Property),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_property(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreatePropertyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let property = app_state
        .property_service
        .create(&user, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(property)))
}

// GET /api/properties/mine
#[utoipa::path(
    get,
    path = "/api/properties/mine",
    tag = "Properties",
    responses(
        (status = 200, description = "Anúncios do usuário logado", body = Vec<Property>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn my_properties(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let properties = app_state
        .property_service
        .list_mine(&user)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(properties))
}

// PUT /api/properties/{id}
#[utoipa::path(
    put,
    path = "/api/properties/{id}",
    tag = "Properties",
    request_body = UpdatePropertyPayload,
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Anúncio atualizado", body = Property),
        (status = 403, description = "Nem dono nem admin, ou campo de moderação sem ser admin"),
        (status = 404, description = "Anúncio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_property(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePropertyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let property = app_state
        .property_service
        .update(&user, id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(property))
}

// DELETE /api/properties/{id}
#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    tag = "Properties",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Anúncio removido", body = MessageResponse),
        (status = 403, description = "Nem dono nem admin"),
        (status = 404, description = "Anúncio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_property(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .property_service
        .delete(&user, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse {
        success: true,
        message: app_state.i18n_store.translate(&locale.0, "deleted", Some("Property")),
    }))
}

// =============================================================================
//  ADMIN (moderação)
// =============================================================================

// GET /api/admin/properties
#[utoipa::path(
    get,
    path = "/api/admin/properties",
    tag = "Admin - Properties",
    params(AdminPropertyQuery),
    responses(
        (status = 200, description = "Todos os anúncios, de qualquer status", body = PropertyPage),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_list_properties(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<AdminPropertyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .property_service
        .list_admin(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// PUT /api/admin/properties/{id}/status
#[utoipa::path(
    put,
    path = "/api/admin/properties/{id}/status",
    tag = "Admin - Properties",
    request_body = UpdatePropertyStatusPayload,
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Status alterado", body = Property),
        (status = 404, description = "Anúncio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_property_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePropertyStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let property = app_state
        .property_service
        .set_status(id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(property))
}

async fn review(
    app_state: AppState,
    locale: Locale,
    id: Uuid,
    decision: ReviewDecision,
) -> Result<Json<Property>, ApiError> {
    let property = app_state
        .property_service
        .review(id, decision)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(property))
}

// PUT /api/admin/properties/{id}/approve
#[utoipa::path(
    put,
    path = "/api/admin/properties/{id}/approve",
    tag = "Admin - Properties",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Anúncio publicado", body = Property),
        (status = 400, description = "Anúncio não está pendente"),
        (status = 404, description = "Anúncio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_property(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>, ApiError> {
    review(app_state, locale, id, ReviewDecision::Approve).await
}

// PUT /api/admin/properties/{id}/reject
#[utoipa::path(
    put,
    path = "/api/admin/properties/{id}/reject",
    tag = "Admin - Properties",
    params(("id" = Uuid, Path, description = "ID do anúncio")),
    responses(
        (status = 200, description = "Anúncio rejeitado", body = Property),
        (status = 400, description = "Anúncio não está pendente"),
        (status = 404, description = "Anúncio não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_property(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>, ApiError> {
    review(app_state, locale, id, ReviewDecision::Reject).await
}
