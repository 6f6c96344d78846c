// src/services/email_service.rs

use std::sync::Arc;

use askama::Template;
use async_trait::async_trait;
use serde::Serialize;

use crate::{
    common::error::AppError,
    models::{
        agent::QuotaSummary,
        auth::User,
        inquiry::{ContactPayload, Inquiry},
        lead::Lead,
    },
};

// =============================================================================
//  TEMPLATES (HTML com escape automático)
// =============================================================================

#[derive(Template)]
#[template(path = "email/inquiry.html")]
struct InquiryEmail<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    message: &'a str,
    property_title: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactEmail<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetEmail<'a> {
    name: &'a str,
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email/lead_assigned.html")]
struct LeadAssignedEmail<'a> {
    agent_name: &'a str,
    lead_name: &'a str,
    lead_email: &'a str,
    lead_phone: &'a str,
    requirements: &'a str,
    assigned: u32,
    suggested: u32,
}

// =============================================================================
//  TRANSPORTE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError>;
}

#[derive(Serialize)]
struct MailApiRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// POST JSON para uma API de e-mail transacional.
pub struct HttpMailTransport {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailTransport {
    pub fn new(url: String, api_key: Option<String>, from: String) -> Self {
        Self { client: reqwest::Client::new(), url, api_key, from }
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError> {
        let body = MailApiRequest {
            from: &self.from,
            to: [&mail.to],
            subject: &mail.subject,
            html: &mail.html,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::MailError(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| AppError::MailError(e.to_string()))?;
        Ok(())
    }
}

/// Sem API configurada: só registra no log.
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), AppError> {
        tracing::info!("📧 [mail desativado] para={} assunto={:?}", mail.to, mail.subject);
        Ok(())
    }
}

// =============================================================================
//  SERVIÇO
// =============================================================================

#[derive(Clone)]
pub struct EmailService {
    transport: Arc<dyn MailTransport>,
    admin_email: Option<String>,
    frontend_url: String,
}

impl EmailService {
    pub fn new(transport: Arc<dyn MailTransport>, admin_email: Option<String>, frontend_url: String) -> Self {
        Self { transport, admin_email, frontend_url }
    }

    async fn deliver(&self, to: &str, subject: String, html: String) -> Result<(), AppError> {
        let mail = OutgoingMail { to: to.to_string(), subject, html };
        self.transport.send(&mail).await?;
        tracing::info!("📧 E-mail enviado para {}", to);
        Ok(())
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password/{}", self.frontend_url, token)
    }

    /// Avisa o admin e, se houver, o corretor do anúncio.
    pub async fn send_inquiry_notification(
        &self,
        inquiry: &Inquiry,
        agent_email: Option<&str>,
    ) -> Result<(), AppError> {
        let html = InquiryEmail {
            name: &inquiry.name,
            email: &inquiry.email,
            phone: inquiry.phone.as_deref().unwrap_or("-"),
            message: &inquiry.message,
            property_title: inquiry.property_title.as_deref(),
        }
        .render()?;

        let subject = match &inquiry.property_title {
            Some(title) => format!("Novo contato sobre \"{}\"", title),
            None => "Novo contato pelo site".to_string(),
        };

        let recipients: Vec<&str> = self.admin_email.as_deref().into_iter().chain(agent_email).collect();
        if recipients.is_empty() {
            tracing::warn!("Contato {} sem destinatário (ADMIN_EMAIL não definido)", inquiry.id);
        }

        // Cada destinatário é independente: uma falha não impede os demais
        let mut first_error = None;
        for to in recipients {
            if let Err(e) = self.deliver(to, subject.clone(), html.clone()).await {
                tracing::warn!("⚠️ Falha ao avisar {} sobre o contato {}: {}", to, inquiry.id, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub async fn send_contact_message(&self, payload: &ContactPayload) -> Result<(), AppError> {
        let html = ContactEmail {
            name: &payload.name,
            email: &payload.email,
            subject: &payload.subject,
            message: &payload.message,
        }
        .render()?;

        let Some(to) = self.admin_email.as_deref() else {
            tracing::warn!("Mensagem de contato de {} recusada: ADMIN_EMAIL não definido", payload.email);
            return Err(AppError::ContactUnavailable);
        };

        self.deliver(to, format!("[Contato] {}", payload.subject), html)
            .await
            .map_err(|e| {
                tracing::warn!("⚠️ Falha ao encaminhar mensagem de contato de {}: {}", payload.email, e);
                AppError::ContactUnavailable
            })
    }

    pub async fn send_password_reset(&self, user: &User, token: &str) -> Result<(), AppError> {
        let link = self.reset_link(token);
        let html = PasswordResetEmail { name: &user.name, link: &link }.render()?;
        self.deliver(&user.email, "Redefinição de senha".to_string(), html).await
    }

    pub async fn send_lead_assigned(&self, agent: &User, lead: &Lead, quota: QuotaSummary) -> Result<(), AppError> {
        let lead_name = match &lead.last_name {
            Some(last) => format!("{} {}", lead.first_name, last),
            None => lead.first_name.clone(),
        };
        let html = LeadAssignedEmail {
            agent_name: &agent.name,
            lead_name: &lead_name,
            lead_email: &lead.email,
            lead_phone: lead.phone.as_deref().unwrap_or("-"),
            requirements: lead.requirements.as_deref().unwrap_or("-"),
            assigned: quota.assigned,
            suggested: quota.suggested,
        }
        .render()?;
        self.deliver(&agent.email, format!("Novo lead: {}", lead_name), html).await
    }
}
