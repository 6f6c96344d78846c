// src/services/inquiry_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InquiryRepository, PropertyRepository, UserRepository},
    models::inquiry::{ContactPayload, CreateInquiryPayload, Inquiry, InquiryStatus},
    services::email_service::EmailService,
};

#[derive(Clone)]
pub struct InquiryService {
    repo: InquiryRepository,
    property_repo: PropertyRepository,
    user_repo: UserRepository,
    email_service: EmailService,
}

impl InquiryService {
    pub fn new(
        repo: InquiryRepository,
        property_repo: PropertyRepository,
        user_repo: UserRepository,
        email_service: EmailService,
    ) -> Self {
        Self { repo, property_repo, user_repo, email_service }
    }

    /// Grava o contato e avisa admin + corretor do anúncio. Falha de e-mail só vai para o log.
    pub async fn create(&self, payload: &CreateInquiryPayload) -> Result<Inquiry, AppError> {
        let property = match payload.property_id {
            Some(property_id) => Some(
                self.property_repo
                    .find_by_id(property_id)
                    .await?
                    .ok_or_else(|| AppError::ResourceNotFound("Property".to_string()))?,
            ),
            None => None,
        };

        let inquiry = self.repo.create(payload).await?;
        tracing::info!("✉️ Novo contato {} registrado", inquiry.id);

        let agent_email = match property.and_then(|p| p.agent_id) {
            Some(agent_id) => self.user_repo.find_by_id(agent_id).await?.map(|agent| agent.email),
            None => None,
        };

        if let Err(e) = self
            .email_service
            .send_inquiry_notification(&inquiry, agent_email.as_deref())
            .await
        {
            tracing::warn!("⚠️ Falha ao notificar o contato {}: {}", inquiry.id, e);
        }
        Ok(inquiry)
    }

    pub async fn list(&self) -> Result<Vec<Inquiry>, AppError> {
        self.repo.list().await
    }

    pub async fn set_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry, AppError> {
        self.repo
            .set_status(id, status)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Inquiry".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::ResourceNotFound("Inquiry".to_string()));
        }
        Ok(())
    }

    // Fale conosco: nada é gravado, então sem entrega não há sucesso
    pub async fn contact(&self, payload: &ContactPayload) -> Result<(), AppError> {
        self.email_service.send_contact_message(payload).await
    }
}
