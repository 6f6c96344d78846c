// src/handlers/inquiries.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    common::extract::{Json, Path},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        auth::MessageResponse,
        inquiry::{ContactPayload, CreateInquiryPayload, Inquiry, UpdateInquiryStatusPayload},
    },
};

// POST /api/inquiries
#[utoipa::path(
    post,
    path = "/api/inquiries",
    tag = "Inquiries",
    request_body = CreateInquiryPayload,
    responses(
        (status = 201, description = "Contato registrado e notificado por e-mail", body = Inquiry),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Anúncio informado não existe")
    )
)]
pub async fn create_inquiry(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateInquiryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let inquiry = app_state
        .inquiry_service
        .create(&payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(inquiry)))
}

// POST /api/contact
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Inquiries",
    request_body = ContactPayload,
    responses(
        (status = 200, description = "Mensagem encaminhada ao admin", body = MessageResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 503, description = "Sem destinatário configurado ou falha no envio")
    )
)]
pub async fn send_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .inquiry_service
        .contact(&payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse {
        success: true,
        message: app_state.i18n_store.translate(&locale.0, "message_sent", None),
    }))
}

// GET /api/admin/inquiries
#[utoipa::path(
    get,
    path = "/api/admin/inquiries",
    tag = "Admin - Inquiries",
    responses(
        (status = 200, description = "Contatos recebidos, mais recentes primeiro", body = Vec<Inquiry>),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_inquiries(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let inquiries = app_state
        .inquiry_service
        .list()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(inquiries))
}

// PUT /api/admin/inquiries/{id}/status
#[utoipa::path(
    put,
    path = "/api/admin/inquiries/{id}/status",
    tag = "Admin - Inquiries",
    request_body = UpdateInquiryStatusPayload,
    params(("id" = Uuid, Path, description = "ID do contato")),
    responses(
        (status = 200, description = "Status atualizado", body = Inquiry),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_inquiry_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInquiryStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let inquiry = app_state
        .inquiry_service
        .set_status(id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(inquiry))
}

// DELETE /api/admin/inquiries/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/inquiries/{id}",
    tag = "Admin - Inquiries",
    params(("id" = Uuid, Path, description = "ID do contato")),
    responses(
        (status = 200, description = "Contato removido", body = MessageResponse),
        (status = 404, description = "Contato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_inquiry(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inquiry_service
        .delete(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse {
        success: true,
        message: app_state.i18n_store.translate(&locale.0, "deleted", Some("Inquiry")),
    }))
}
