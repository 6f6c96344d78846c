// src/handlers/coupons.rs

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
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::MessageResponse,
        coupon::{CouponView, CreateCouponPayload},
    },
};

// POST /api/admin/coupons
#[utoipa::path(
    post,
    path = "/api/admin/coupons",
    tag = "Admin - Coupons",
    request_body = CreateCouponPayload,
    responses(
        (status = 201, description = "Cupom criado com código gerado", body = CouponView),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Código gerado colidiu com um existente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_coupon(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(admin): AuthenticatedUser,
    Json(payload): Json<CreateCouponPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let coupon = app_state
        .coupon_service
        .create(&payload, admin.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(coupon)))
}

// GET /api/admin/coupons
#[utoipa::path(
    get,
    path = "/api/admin/coupons",
    tag = "Admin - Coupons",
    responses(
        (status = 200, description = "Cupons com validade e status calculados", body = Vec<CouponView>),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_coupons(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let coupons = app_state
        .coupon_service
        .list()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(coupons))
}

// DELETE /api/admin/coupons/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/coupons/{id}",
    tag = "Admin - Coupons",
    params(("id" = Uuid, Path, description = "ID do cupom")),
    responses(
        (status = 200, description = "Cupom removido", body = MessageResponse),
        (status = 404, description = "Cupom não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_coupon(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .coupon_service
        .delete(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(MessageResponse {
        success: true,
        message: app_state.i18n_store.translate(&locale.0, "deleted", Some("Coupon")),
    }))
}

// GET /api/coupons/{code}
#[utoipa::path(
    get,
    path = "/api/coupons/{code}",
    tag = "Coupons",
    params(("code" = String, Path, description = "Código do cupom")),
    responses(
        (status = 200, description = "Cupom com status de validade", body = CouponView),
        (status = 404, description = "Código desconhecido")
    )
)]
pub async fn lookup_coupon(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let coupon = app_state
        .coupon_service
        .find_by_code(&code)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(coupon))
}
