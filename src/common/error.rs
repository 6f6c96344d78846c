// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use convert_case::{Case, Casing};
use serde_json::{json, Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erros de domínio. Cada variante vira uma chave do catálogo de mensagens.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    // Corpo, caminho ou query que o axum não conseguiu extrair
    #[error("Requisição malformada ({0}): {1}")]
    MalformedRequest(&'static str, String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Anúncio não está pendente (status: {0})")]
    PropertyNotPending(String),

    #[error("Usuário {0} não é corretor")]
    InvalidAgent(Uuid),

    #[error("Código de cupom duplicado")]
    CouponCodeConflict,

    #[error("Token de redefinição inválido")]
    InvalidResetToken,

    #[error("Registro de admin desativado")]
    AdminRegistrationDisabled,

    #[error("Chave de admin inválida")]
    InvalidAdminKey,

    #[error("Não é possível excluir a própria conta")]
    CannotDeleteSelf,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro de template: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Erro no envio de e-mail: {0}")]
    MailError(String),

    #[error("Fale conosco indisponível")]
    ContactUnavailable,
}

// O erro que sai pela API: `{ "success": false, "message": ..., "details"?: ... }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::MalformedRequest(..)
            | AppError::PropertyNotPending(_)
            | AppError::InvalidAgent(_)
            | AppError::InvalidResetToken
            | AppError::CannotDeleteSelf => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden
            | AppError::AdminRegistrationDisabled
            | AppError::InvalidAdminKey => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::CouponCodeConflict
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::ContactUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte para a resposta HTTP, traduzindo a mensagem para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();
        let lang = locale.0.as_str();

        let (key, arg): (&str, Option<String>) = match &self {
            AppError::ValidationError(errors) => {
                // Mantém o padrão: todos os campos com as mensagens traduzidas
                let mut details = Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_deref().unwrap_or(e.code.as_ref());
                            Value::String(store.translate(lang, code, None))
                        })
                        .collect();
                    // Mesmo nome do campo no JSON (camelCase)
                    details.insert(field.to_case(Case::Camel), Value::Array(messages));
                }
                return ApiError {
                    status,
                    message: store.translate(lang, "validation_failed", None),
                    details: Some(Value::Object(details)),
                };
            }
            AppError::BadRequest(code) => ("bad_request", Some(store.translate(lang, code, None))),
            AppError::MalformedRequest(key, detail) => (*key, Some(detail.clone())),
            AppError::EmailAlreadyExists => ("email_already_exists", None),
            AppError::InvalidCredentials => ("invalid_credentials", None),
            AppError::InvalidToken => ("invalid_token", None),
            AppError::Forbidden => ("forbidden", None),
            AppError::UserNotFound => ("user_not_found", None),
            AppError::ResourceNotFound(what) => ("resource_not_found", Some(what.clone())),
            AppError::PropertyNotPending(current) => ("property_not_pending", Some(current.clone())),
            AppError::InvalidAgent(id) => ("invalid_agent", Some(id.to_string())),
            AppError::CouponCodeConflict => ("coupon_code_conflict", None),
            AppError::InvalidResetToken => ("invalid_reset_token", None),
            AppError::AdminRegistrationDisabled => ("admin_registration_disabled", None),
            AppError::InvalidAdminKey => ("invalid_admin_key", None),
            AppError::CannotDeleteSelf => ("cannot_delete_self", None),
            AppError::UniqueConstraintViolation(what) => ("unique_violation", Some(what.clone())),
            AppError::ContactUnavailable => ("contact_unavailable", None),
            // Todos os outros erros viram 500. O detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ("internal_error", None)
            }
        };

        ApiError::new(status, store.translate(lang, key, arg.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct SignupForm {
        #[validate(email(message = "invalid_email"))]
        email: String,
        #[validate(length(min = 1, message = "required"))]
        first_name: String,
    }

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn maps_domain_errors_to_status_codes() {
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ResourceNotFound("Lead".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::CouponCodeConflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::PropertyNotPending("sold".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MailError("smtp down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_carry_translated_details() {
        let errors = SignupForm { email: "not-an-email".into(), first_name: String::new() }
            .validate()
            .unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &I18nStore::new());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Um ou mais campos são inválidos.");
        let details = api.details.expect("details");
        assert_eq!(details["email"][0], "Endereço de e-mail inválido.");
        assert_eq!(details["firstName"][0], "Este campo é obrigatório.");
        assert!(details.get("first_name").is_none());
    }

    #[test]
    fn malformed_requests_are_bad_requests() {
        let api = AppError::MalformedRequest("invalid_body", "missing field `email`".into())
            .to_api_error(&en(), &I18nStore::new());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Invalid request body: missing field `email`");
    }

    #[test]
    fn unavailable_contact_form_is_503() {
        let api = AppError::ContactUnavailable.to_api_error(&Locale("pt".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(api.message, "Não foi possível enviar a mensagem agora, tente mais tarde.");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::MailError("relay refused: secret-host".into())
            .to_api_error(&en(), &I18nStore::new());
        assert_eq!(api.message, "An unexpected error occurred.");
        assert!(api.details.is_none());
    }

    #[test]
    fn not_found_names_the_resource() {
        let api = AppError::ResourceNotFound("Coupon".into()).to_api_error(&en(), &I18nStore::new());
        assert_eq!(api.message, "Coupon not found.");
    }
}
